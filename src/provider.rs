use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::api::CricketApi;
use crate::error::ApiError;
use crate::state::{Delta, ProviderCommand, ToastLevel};

const LOAD_STATUS_MSG: &str = "Failed to load data from server";
const LOAD_CONNECT_MSG: &str = "Cannot connect to server. Please start the backend.";
const CONNECT_MSG: &str = "Failed to connect to server";

/// Runs backend commands on a worker thread until the command sender is dropped.
pub fn spawn_provider(
    api: CricketApi,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        info!(base_url = api.base_url(), "provider started");
        for cmd in cmd_rx {
            handle_command(&api, cmd, &tx);
        }
        info!("provider stopped");
    })
}

/// Executes one command and reports every outcome as deltas. Never fails:
/// errors become toasts or console lines and the UI keeps its last good state.
pub fn handle_command(api: &CricketApi, cmd: ProviderCommand, tx: &Sender<Delta>) {
    match cmd {
        ProviderCommand::LoadPlayers => load_players(api, tx),
        ProviderCommand::FetchTopPerformers => match api.top_players() {
            Ok(rows) => send(tx, Delta::SetTopPerformers(rows)),
            Err(err) => log_fetch_error(tx, "Top performers", &err),
        },
        ProviderCommand::FetchPlayersInForm => match api.players_in_form() {
            Ok(rows) => send(tx, Delta::SetPlayersInForm(rows)),
            Err(err) => log_fetch_error(tx, "Players in form", &err),
        },
        ProviderCommand::FetchTeamStats => match api.team_stats() {
            Ok(stats) => send(tx, Delta::SetTeamStats(stats)),
            Err(err) => log_fetch_error(tx, "Statistics", &err),
        },
        ProviderCommand::CreatePlayer(player) => match api.create_player(&player) {
            Ok(_) => {
                send(tx, Delta::PlayerAdded);
                reload_after_mutation(api, tx);
            }
            Err(err) => {
                let message = if err.is_network() {
                    "Failed to connect to server. Please ensure the backend is running."
                        .to_string()
                } else {
                    server_or(&err, || match err.status() {
                        Some(status) => format!("Failed to add player: {}", status.as_u16()),
                        None => "Failed to add player".to_string(),
                    })
                };
                fail(tx, "Add player", &err, message);
            }
        },
        ProviderCommand::AddMatch(entry) => match api.add_match(&entry) {
            Ok(_) => {
                send(tx, Delta::MatchAdded);
                reload_after_mutation(api, tx);
            }
            Err(err) => {
                let message = if err.is_network() {
                    CONNECT_MSG.to_string()
                } else {
                    server_or(&err, || "Failed to add match statistics".to_string())
                };
                fail(tx, "Add match", &err, message);
            }
        },
        ProviderCommand::DeletePlayer { id, name } => match api.delete_player(id) {
            Ok(()) => {
                send(tx, Delta::PlayerDeleted { id, name });
                reload_after_mutation(api, tx);
            }
            Err(err) => {
                let message = match err.status() {
                    Some(status) => format!("Failed to delete player: {}", status.as_u16()),
                    None => CONNECT_MSG.to_string(),
                };
                fail(tx, "Delete player", &err, message);
            }
        },
        ProviderCommand::Ping => match api.ping() {
            Ok(()) => toast(tx, ToastLevel::Success, "Server is running and responding!"),
            Err(err) => {
                let message = match err.status() {
                    Some(status) => format!("Server error: {}", status.as_u16()),
                    None => LOAD_CONNECT_MSG.to_string(),
                };
                fail(tx, "Connection test", &err, message);
            }
        },
    }
}

fn load_players(api: &CricketApi, tx: &Sender<Delta>) {
    match api.list_players() {
        Ok(players) => send(tx, Delta::SetPlayers(players)),
        Err(err) => {
            let message = if err.is_network() {
                LOAD_CONNECT_MSG
            } else {
                LOAD_STATUS_MSG
            };
            fail(tx, "Load players", &err, message.to_string());
        }
    }
}

// Every successful mutation is followed by a full authoritative reload.
fn reload_after_mutation(api: &CricketApi, tx: &Sender<Delta>) {
    load_players(api, tx);
    handle_command(api, ProviderCommand::FetchTopPerformers, tx);
    handle_command(api, ProviderCommand::FetchPlayersInForm, tx);
}

fn server_or(err: &ApiError, fallback: impl FnOnce() -> String) -> String {
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(fallback)
}

fn fail(tx: &Sender<Delta>, what: &str, err: &ApiError, message: String) {
    warn!(error = %err, "{what} failed");
    send(tx, Delta::Log(format!("[WARN] {what} failed: {err}")));
    toast(tx, ToastLevel::Error, message);
}

fn log_fetch_error(tx: &Sender<Delta>, what: &str, err: &ApiError) {
    warn!(error = %err, "{what} fetch failed");
    send(tx, Delta::Log(format!("[WARN] {what} fetch error: {err}")));
}

fn toast(tx: &Sender<Delta>, level: ToastLevel, message: impl Into<String>) {
    send(
        tx,
        Delta::Toast {
            level,
            message: message.into(),
        },
    );
}

fn send(tx: &Sender<Delta>, delta: Delta) {
    let _ = tx.send(delta);
}
