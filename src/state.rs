use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::forms::{MatchForm, PlayerForm};
use crate::model::{NewMatch, NewPlayer, Player, TeamStats, TopPerformer};
use crate::stats::{DEFAULT_RECENT_COUNT, DEFAULT_TOP_COUNT};
use crate::store::PlayerStore;

pub const TOAST_DURATION: Duration = Duration::from_secs(3);
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Players,
    AddMatch,
    Statistics,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Players, Tab::AddMatch, Tab::Statistics];

    pub fn index(self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Players => 1,
            Tab::AddMatch => 2,
            Tab::Statistics => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Players => "Players",
            Tab::AddMatch => "Add Match",
            Tab::Statistics => "Statistics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Help,
    AddPlayer,
    PlayerDetail { player_id: u32 },
    ConfirmDelete { player_id: u32, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub shown_at: Instant,
}

/// Work for the background provider. Each command is one backend round-trip
/// (plus the reloads a successful mutation triggers).
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCommand {
    LoadPlayers,
    FetchTopPerformers,
    FetchPlayersInForm,
    FetchTeamStats,
    CreatePlayer(NewPlayer),
    AddMatch(NewMatch),
    DeletePlayer { id: u32, name: String },
    Ping,
}

/// Results flowing back from the provider to the UI thread.
#[derive(Debug, Clone)]
pub enum Delta {
    SetPlayers(Vec<Player>),
    SetTopPerformers(Vec<TopPerformer>),
    SetPlayersInForm(Vec<TopPerformer>),
    SetTeamStats(TeamStats),
    PlayerAdded,
    MatchAdded,
    PlayerDeleted { id: u32, name: String },
    Toast { level: ToastLevel, message: String },
    Log(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub store: PlayerStore,
    /// Server rankings; `None` until the first successful fetch.
    pub top_performers: Option<Vec<TopPerformer>>,
    pub players_in_form: Option<Vec<TopPerformer>>,
    pub team_stats: Option<TeamStats>,
    pub selected: usize,
    pub search: String,
    pub search_active: bool,
    pub player_form: PlayerForm,
    pub match_form: MatchForm,
    pub match_form_active: bool,
    pub overlay: Option<Overlay>,
    pub toast: Option<Toast>,
    pub logs: VecDeque<String>,
    pub top_count: usize,
    pub recent_count: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::Dashboard,
            store: PlayerStore::new(),
            top_performers: None,
            players_in_form: None,
            team_stats: None,
            selected: 0,
            search: String::new(),
            search_active: false,
            player_form: PlayerForm::new(),
            match_form: MatchForm::new(),
            match_form_active: false,
            overlay: None,
            toast: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            top_count: DEFAULT_TOP_COUNT,
            recent_count: DEFAULT_RECENT_COUNT,
        }
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            top_count: config.top_count,
            recent_count: config.recent_count,
            ..Self::new()
        }
    }

    /// Commands for the first frame: roster plus the dashboard panels.
    pub fn startup_commands(&self) -> Vec<ProviderCommand> {
        vec![
            ProviderCommand::LoadPlayers,
            ProviderCommand::FetchTopPerformers,
            ProviderCommand::FetchPlayersInForm,
        ]
    }

    /// Switches the visible tab and returns what the new tab needs fetched.
    pub fn switch_tab(&mut self, tab: Tab) -> Vec<ProviderCommand> {
        self.tab = tab;
        self.search_active = false;
        self.match_form_active = false;
        match tab {
            Tab::Dashboard => vec![
                ProviderCommand::FetchTopPerformers,
                ProviderCommand::FetchPlayersInForm,
            ],
            Tab::Players => {
                self.clamp_selection();
                vec![ProviderCommand::LoadPlayers]
            }
            Tab::AddMatch => {
                self.match_form.retain_player(self.store.players());
                Vec::new()
            }
            Tab::Statistics => vec![ProviderCommand::FetchTeamStats],
        }
    }

    /// Manual refresh: reload the roster and whatever the current tab shows.
    pub fn refresh(&mut self) -> Vec<ProviderCommand> {
        self.push_log("[INFO] Manual refresh");
        let mut cmds = vec![ProviderCommand::LoadPlayers];
        match self.tab {
            Tab::Dashboard => {
                cmds.push(ProviderCommand::FetchTopPerformers);
                cmds.push(ProviderCommand::FetchPlayersInForm);
            }
            Tab::Statistics => cmds.push(ProviderCommand::FetchTeamStats),
            Tab::Players | Tab::AddMatch => {}
        }
        cmds
    }

    pub fn filtered_players(&self) -> Vec<&Player> {
        self.store.search(&self.search)
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.filtered_players().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let total = self.filtered_players().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.filtered_players().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.filtered_players().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.push(ch);
        self.selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.selected = 0;
    }

    pub fn open_add_player(&mut self) {
        self.player_form.reset();
        self.overlay = Some(Overlay::AddPlayer);
    }

    pub fn open_selected_detail(&mut self) {
        if let Some(player_id) = self.selected_player().map(|p| p.id) {
            self.overlay = Some(Overlay::PlayerDetail { player_id });
        }
    }

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Some(Overlay::Help) => None,
            _ => Some(Overlay::Help),
        };
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Opens the delete confirmation for the selected (or detailed) player.
    pub fn request_delete(&mut self) {
        let target = match &self.overlay {
            Some(Overlay::PlayerDetail { player_id }) => self.store.find(*player_id),
            _ => self.selected_player(),
        };
        let Some((player_id, name)) = target.map(|p| (p.id, p.name.clone())) else {
            return;
        };
        self.overlay = Some(Overlay::ConfirmDelete { player_id, name });
    }

    /// Answers the delete confirmation. Declining sends nothing.
    pub fn resolve_delete(&mut self, confirmed: bool) -> Option<ProviderCommand> {
        if !matches!(self.overlay, Some(Overlay::ConfirmDelete { .. })) {
            return None;
        }
        let Some(Overlay::ConfirmDelete { player_id, name }) = self.overlay.take() else {
            return None;
        };
        if !confirmed {
            self.push_log(format!("[INFO] Delete of \"{name}\" cancelled"));
            return None;
        }
        Some(ProviderCommand::DeletePlayer {
            id: player_id,
            name,
        })
    }

    /// Validates the add-player form. Invalid input raises a toast and sends nothing.
    pub fn submit_player_form(&mut self) -> Option<ProviderCommand> {
        match self.player_form.validate() {
            Ok(player) => Some(ProviderCommand::CreatePlayer(player)),
            Err(err) => {
                self.show_toast(ToastLevel::Error, err.to_string());
                None
            }
        }
    }

    /// Resolves the chosen player against the current roster and builds the
    /// match request. A stale or missing player raises a toast.
    pub fn submit_match_form(&mut self) -> Option<ProviderCommand> {
        match self.match_form.build(self.store.players()) {
            Ok(entry) => Some(ProviderCommand::AddMatch(entry)),
            Err(err) => {
                self.show_toast(ToastLevel::Error, err.to_string());
                None
            }
        }
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        let prefix = match level {
            ToastLevel::Info | ToastLevel::Success => "[INFO]",
            ToastLevel::Error => "[ERROR]",
        };
        self.push_log(format!("{prefix} {message}"));
        self.toast = Some(Toast {
            level,
            message,
            shown_at: Instant::now(),
        });
    }

    pub fn active_toast(&self, now: Instant) -> Option<&Toast> {
        self.toast
            .as_ref()
            .filter(|t| now.saturating_duration_since(t.shown_at) < TOAST_DURATION)
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.active_toast(now).is_none() {
            self.toast = None;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetPlayers(players) => {
            let count = players.len();
            state.store.replace(players);
            state.clamp_selection();
            state.match_form.retain_player(state.store.players());
            if let Some(Overlay::PlayerDetail { player_id }) = state.overlay
                && state.store.find(player_id).is_none()
            {
                state.overlay = None;
            }
            state.push_log(format!("[INFO] Loaded {count} players"));
        }
        Delta::SetTopPerformers(rows) => state.top_performers = Some(rows),
        Delta::SetPlayersInForm(rows) => state.players_in_form = Some(rows),
        Delta::SetTeamStats(stats) => state.team_stats = Some(stats),
        Delta::PlayerAdded => {
            state.player_form.reset();
            if state.overlay == Some(Overlay::AddPlayer) {
                state.overlay = None;
            }
            state.show_toast(ToastLevel::Success, "Player added successfully!");
        }
        Delta::MatchAdded => {
            state.match_form.reset();
            state.match_form_active = false;
            state.show_toast(ToastLevel::Success, "Match statistics added successfully!");
        }
        Delta::PlayerDeleted { id, name } => {
            if state.overlay == Some(Overlay::PlayerDetail { player_id: id }) {
                state.overlay = None;
            }
            state.show_toast(
                ToastLevel::Success,
                format!("Player \"{name}\" deleted successfully!"),
            );
        }
        Delta::Toast { level, message } => state.show_toast(level, message),
        Delta::Log(msg) => state.push_log(msg),
    }
}
