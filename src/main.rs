use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};

use cricket_terminal::api::CricketApi;
use cricket_terminal::config::Config;
use cricket_terminal::forms::{MatchField, PlayerField};
use cricket_terminal::state::{
    AppState, Delta, Overlay, ProviderCommand, Tab, ToastLevel, apply_delta,
};
use cricket_terminal::{logging, provider, stats, view};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn dispatch(&mut self, cmds: impl IntoIterator<Item = ProviderCommand>) {
        for cmd in cmds {
            self.send(cmd);
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Backend unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider stopped, request dropped");
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        let cmds = self.state.switch_tab(tab);
        self.dispatch(cmds);
    }

    fn on_key(&mut self, key: KeyEvent) {
        match self.state.overlay.clone() {
            Some(Overlay::ConfirmDelete { .. }) => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        if let Some(cmd) = self.state.resolve_delete(true) {
                            self.send(cmd);
                        }
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        self.state.resolve_delete(false);
                    }
                    _ => {}
                }
                return;
            }
            Some(Overlay::AddPlayer) => {
                self.on_player_form_key(key);
                return;
            }
            Some(Overlay::PlayerDetail { .. }) => {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('b') => {
                        self.state.close_overlay()
                    }
                    KeyCode::Char('x') | KeyCode::Delete => self.state.request_delete(),
                    KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                }
                return;
            }
            Some(Overlay::Help) => {
                match key.code {
                    KeyCode::Char('?') | KeyCode::Esc => self.state.close_overlay(),
                    KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                }
                return;
            }
            None => {}
        }

        if self.state.search_active {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.state.search_active = false,
                KeyCode::Backspace => self.state.pop_search_char(),
                KeyCode::Char(ch) => self.state.push_search_char(ch),
                _ => {}
            }
            return;
        }

        if self.state.match_form_active {
            self.on_match_form_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.switch_tab(Tab::Dashboard),
            KeyCode::Char('2') => self.switch_tab(Tab::Players),
            KeyCode::Char('3') => self.switch_tab(Tab::AddMatch),
            KeyCode::Char('4') => self.switch_tab(Tab::Statistics),
            KeyCode::Tab => {
                let next = Tab::ALL[(self.state.tab.index() + 1) % Tab::ALL.len()];
                self.switch_tab(next);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let cmds = self.state.refresh();
                self.dispatch(cmds);
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.state.push_log("[INFO] Testing server connection");
                self.send(ProviderCommand::Ping);
            }
            KeyCode::Char('?') => self.state.toggle_help(),
            _ => self.on_tab_key(key),
        }
    }

    fn on_tab_key(&mut self, key: KeyEvent) {
        match self.state.tab {
            Tab::Players => match key.code {
                KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
                KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
                KeyCode::Char('/') => self.state.search_active = true,
                KeyCode::Enter | KeyCode::Char('d') => self.state.open_selected_detail(),
                KeyCode::Char('a') | KeyCode::Char('A') => self.state.open_add_player(),
                KeyCode::Char('x') | KeyCode::Delete => self.state.request_delete(),
                KeyCode::Esc => {
                    self.state.search.clear();
                    self.state.clamp_selection();
                }
                _ => {}
            },
            Tab::AddMatch => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('e')) {
                    self.state.match_form_active = true;
                }
            }
            Tab::Dashboard | Tab::Statistics => {}
        }
    }

    fn on_player_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.close_overlay();
                return;
            }
            KeyCode::Enter => {
                if let Some(cmd) = self.state.submit_player_form() {
                    self.send(cmd);
                }
                return;
            }
            _ => {}
        }
        let form = &mut self.state.player_form;
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left => form.cycle_choice(false),
            KeyCode::Right => form.cycle_choice(true),
            KeyCode::Char(' ') if form.focus == PlayerField::Role => form.cycle_choice(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) => form.push_char(ch),
            _ => {}
        }
    }

    fn on_match_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.match_form_active = false;
                return;
            }
            KeyCode::Enter => {
                if let Some(cmd) = self.state.submit_match_form() {
                    self.send(cmd);
                }
                return;
            }
            _ => {}
        }
        let players = self.state.store.players();
        let form = &mut self.state.match_form;
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left => form.cycle_choice(players, false),
            KeyCode::Right => form.cycle_choice(players, true),
            KeyCode::Char(' ') if matches!(form.focus, MatchField::Player | MatchField::Kind) => {
                form.cycle_choice(players, true)
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) => form.push_char(ch),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let _log_guard = match logging::init_logging(config.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("warning: file logging disabled: {err:#}");
            None
        }
    };
    let api = CricketApi::from_config(&config)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let _provider = provider::spawn_provider(api, tx, cmd_rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(AppState::with_config(&config), Some(cmd_tx));
    let startup = app.state.startup_commands();
    app.dispatch(startup);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.state.expire_toast(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let state = &app.state;
    let titles = Tab::ALL
        .iter()
        .map(|tab| format!("{} {}", tab.index() + 1, tab.title()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(format!(" CRICKET STATS | {} ", view::header_text(state)))
                .borders(Borders::BOTTOM),
        );
    frame.render_widget(tabs, chunks[0]);

    match state.tab {
        Tab::Dashboard => render_dashboard(frame, chunks[1], state),
        Tab::Players => render_players(frame, chunks[1], state),
        Tab::AddMatch => render_add_match(frame, chunks[1], state),
        Tab::Statistics => render_statistics(frame, chunks[1], state),
    }

    render_console(frame, chunks[2], state);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    match &state.overlay {
        Some(Overlay::Help) => render_help_overlay(frame, frame.size()),
        Some(Overlay::AddPlayer) => render_player_form(frame, frame.size(), state),
        Some(Overlay::PlayerDetail { player_id }) => {
            if let Some(player) = state.store.find(*player_id) {
                render_popup(frame, 80, 80, "Player", view::player_detail_text(player));
            }
        }
        Some(Overlay::ConfirmDelete { name, .. }) => {
            render_popup(frame, 60, 40, "Delete Player", view::delete_prompt_text(name));
        }
        None => {}
    }
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return "Type to filter | Backspace Delete | Enter/Esc Done".to_string();
    }
    if state.match_form_active {
        return "Tab/↑/↓ Field | ←/→/Space Choose | Enter Submit | Esc Stop editing".to_string();
    }
    match state.tab {
        Tab::Players => {
            "1-4 Tabs | j/k Move | / Search | Enter Details | a Add | x Delete | r Refresh | ? Help | q Quit"
                .to_string()
        }
        Tab::AddMatch => "1-4 Tabs | Enter/e Edit form | r Refresh | ? Help | q Quit".to_string(),
        Tab::Dashboard | Tab::Statistics => {
            "1-4 Tabs | r Refresh | t Test connection | ? Help | q Quit".to_string()
        }
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(20)])
        .split(rows[1]);

    let performers = view::top_performers_rows(state);
    let top_panel = Paragraph::new(view::top_performers_text(&performers))
        .block(Block::default().title("Top Performers").borders(Borders::ALL));
    frame.render_widget(top_panel, top[0]);

    let in_form = view::players_in_form_rows(state);
    let form_panel = Paragraph::new(view::players_in_form_text(&in_form))
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Players in Form").borders(Borders::ALL));
    frame.render_widget(form_panel, top[1]);

    let roles = Paragraph::new(view::role_distribution_text(state.store.players()))
        .block(Block::default().title("Roles").borders(Borders::ALL));
    frame.render_widget(roles, bottom[0]);

    let recent = stats::recent_matches(state.store.players(), state.recent_count);
    let recent_panel = Paragraph::new(view::recent_matches_text(&recent))
        .block(Block::default().title("Recent Matches").borders(Borders::ALL));
    frame.render_widget(recent_panel, bottom[1]);
}

fn render_players(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let cursor = if state.search_active { "_" } else { "" };
    let search_style = if state.search_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let search = Paragraph::new(format!("Search: {}{cursor}", state.search)).style(search_style);
    frame.render_widget(search, sections[0]);

    let header = Paragraph::new(format!(
        "{:<20} {:<8} {:>3} {:>6} {:>5}",
        "Name", "Role", "M", "Avg", "Best"
    ))
    .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(header, sections[1]);

    let list_area = sections[2];
    let players = state.filtered_players();
    if players.is_empty() {
        let empty = Paragraph::new(view::players_empty_text(!state.search.is_empty()))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, players.len(), visible);
    let lines = (start..end)
        .map(|idx| {
            let style = if idx == state.selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::styled(view::player_row_text(players[idx]), style)
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines), list_area);
}

fn render_add_match(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let form = &state.match_form;
    let players = state.store.players();
    let player_label = form
        .player_id
        .and_then(|id| state.store.find(id))
        .map(view::player_option_label)
        .unwrap_or_else(|| "Select Player".to_string());
    let kind = if form.is_home { "Home" } else { "Away" };

    let fields = [
        (MatchField::Player, "Player", format!("< {player_label} >")),
        (MatchField::Date, "Date", form.date.clone()),
        (MatchField::Score, "Score", form.score.clone()),
        (MatchField::Opponent, "Opponent", form.opponent.clone()),
        (MatchField::Venue, "Venue", form.venue.clone()),
        (MatchField::Kind, "Type", format!("< {kind} >")),
    ];
    let mut lines = Vec::with_capacity(fields.len() + 2);
    for (field, label, value) in fields {
        let focused = state.match_form_active && form.focus == field;
        let marker = if focused { ">" } else { " " };
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::styled(format!("{marker} {label:<9} {value}"), style));
    }
    lines.push(Line::from(String::new()));
    lines.push(Line::styled(
        view::score_hint(players, form.player_id),
        Style::default().fg(Color::DarkGray),
    ));

    let title = if state.match_form_active {
        "Add Match (editing)"
    } else {
        "Add Match"
    };
    let form_panel =
        Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(form_panel, columns[0]);

    let options = if state.store.is_empty() {
        "No players yet".to_string()
    } else {
        players
            .iter()
            .map(|p| {
                let prefix = if form.player_id == Some(p.id) { "> " } else { "  " };
                format!("{prefix}{}", view::player_option_label(p))
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let options_panel =
        Paragraph::new(options).block(Block::default().title("Players").borders(Borders::ALL));
    frame.render_widget(options_panel, columns[1]);
}

fn render_statistics(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let team = view::team_stats_for(state);
    let summary = Paragraph::new(view::team_stats_text(&team))
        .block(Block::default().title("Team").borders(Borders::ALL));
    frame.render_widget(summary, columns[0]);

    let roles = Paragraph::new(view::role_averages_text(&team))
        .block(Block::default().title("Role Averages").borders(Borders::ALL));
    frame.render_widget(roles, columns[1]);
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let (text, style) = match state.active_toast(Instant::now()) {
        Some(toast) => {
            let color = match toast.level {
                ToastLevel::Info => Color::Cyan,
                ToastLevel::Success => Color::Green,
                ToastLevel::Error => Color::Red,
            };
            (view::toast_text(toast), Style::default().fg(color))
        }
        None => (view::console_text(state), Style::default()),
    };
    let console = Paragraph::new(text)
        .style(style)
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn render_player_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup_area);

    let form = &state.player_form;
    let role = form
        .role
        .as_ref()
        .map(|r| r.as_str().to_string())
        .unwrap_or_else(|| "Select Role".to_string());
    let line = |field: PlayerField, label: &str, value: String| {
        let focused = form.focus == field;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let marker = if focused { ">" } else { " " };
        Line::styled(format!("{marker} {label:<5} {value}"), style)
    };
    let lines = vec![
        line(PlayerField::Name, "Name", format!("{}_", form.name)),
        line(PlayerField::Role, "Role", format!("< {role} >")),
        Line::from(String::new()),
        Line::styled(
            "Tab Field | ←/→ Role | Enter Save | Esc Cancel".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let popup = Paragraph::new(lines)
        .block(Block::default().title("Add Player").borders(Borders::ALL));
    frame.render_widget(popup, popup_area);
}

fn render_popup(frame: &mut Frame, percent_x: u16, percent_y: u16, title: &str, text: String) {
    let popup_area = centered_rect(percent_x, percent_y, frame.size());
    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(popup, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Cricket Stats Terminal - Help",
        "",
        "Global:",
        "  1-4 / Tab    Dashboard, Players, Add Match, Statistics",
        "  r            Refresh from server",
        "  t            Test server connection",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Players:",
        "  j/k or ↑/↓   Move",
        "  /            Search by name or role",
        "  Enter        Player details",
        "  a            Add player",
        "  x            Delete player (asks first)",
        "",
        "Add Match:",
        "  Enter / e    Edit the form, Enter again to submit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
