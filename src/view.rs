use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate};

use crate::model::{Player, TeamStats, TopPerformer};
use crate::state::{AppState, Toast, ToastLevel};
use crate::stats::{self, RecentMatch};

const RECENT_TREND: usize = 5;

/// `2024-03-05` → `Mar 5, 2024`. Anything unparseable is shown verbatim.
pub fn format_date(raw: &str) -> String {
    match stats::parse_match_date(raw) {
        Some(date) => format_naive_date(date),
        None => raw.trim().to_string(),
    }
}

fn format_naive_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn header_text(state: &AppState) -> String {
    let store = &state.store;
    let mut text = format!(
        "Players: {} | Matches: {} | Team avg: {:.1}",
        store.len(),
        store.total_matches(),
        store.team_average()
    );
    if let Some(loaded_at) = store.loaded_at() {
        text.push_str(&format!(" | Updated {}", format_clock(loaded_at)));
    }
    text
}

/// Local wall-clock time as `HH:MM:SS`.
pub fn format_clock(at: SystemTime) -> String {
    DateTime::<Local>::from(at).format("%H:%M:%S").to_string()
}

pub fn role_distribution_text(players: &[Player]) -> String {
    let counts = stats::role_counts(players);
    format!("Batsmen: {}\nBowlers: {}", counts.batsmen, counts.bowlers)
}

/// Server rankings when we have them, otherwise ranked from the local roster.
pub fn top_performers_rows(state: &AppState) -> Vec<TopPerformer> {
    if let Some(rows) = &state.top_performers {
        return rows.clone();
    }
    stats::top_performers(state.store.players(), state.top_count)
        .into_iter()
        .map(|(player, average)| performer_row(player, average))
        .collect()
}

pub fn players_in_form_rows(state: &AppState) -> Vec<TopPerformer> {
    if let Some(rows) = &state.players_in_form {
        return rows.clone();
    }
    stats::players_in_form(state.store.players())
        .into_iter()
        .map(|player| performer_row(player, stats::average(player)))
        .collect()
}

fn performer_row(player: &Player, average: f64) -> TopPerformer {
    TopPerformer {
        id: Some(player.id),
        name: player.name.clone(),
        role: player.role.clone(),
        average,
    }
}

pub fn top_performers_text(rows: &[TopPerformer]) -> String {
    if rows.is_empty() {
        return "No Players\nAdd players to see top performers".to_string();
    }
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            format!(
                "{:>2}. {:<20} {:<8} {:>6.1}",
                idx + 1,
                row.name,
                row.role,
                row.average
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn players_in_form_text(rows: &[TopPerformer]) -> String {
    if rows.is_empty() {
        return "No Players in Form\nPlayers need at least 3 matches to be in form".to_string();
    }
    rows.iter()
        .map(|row| format!("* {} ({})", row.name, row.role))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn recent_matches_text(matches: &[RecentMatch<'_>]) -> String {
    if matches.is_empty() {
        return "No Recent Matches\nAdd match statistics to see recent matches".to_string();
    }
    matches
        .iter()
        .map(|m| {
            format!(
                "{:<13} {} vs {} at {}",
                format_date(&m.stat.date),
                m.player,
                m.stat.opponent,
                m.stat.venue
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One roster row: name, role, matches, average, best.
pub fn player_row_text(player: &Player) -> String {
    format!(
        "{:<20} {:<8} {:>3} {:>6.1} {:>5}",
        player.name,
        player.role,
        stats::matches_played(player),
        stats::career_average(player),
        stats::career_best(player)
    )
}

pub fn players_empty_text(searching: bool) -> String {
    if searching {
        "No players match the search".to_string()
    } else {
        "No Players\nAdd players to get started (a), or press r to refresh".to_string()
    }
}

pub fn player_detail_text(player: &Player) -> String {
    let in_form = if stats::career_in_form(player) { "Yes" } else { "No" };
    let trend = stats::recent_scores(player, RECENT_TREND)
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        player.name.clone(),
        String::new(),
        format!("Role: {}", player.role),
        format!("Total Matches: {}", stats::matches_played(player)),
        format!("Average: {:.1}", stats::career_average(player)),
        format!("Best Score: {}", stats::career_best(player)),
        format!(
            "Home Matches: {} (Avg: {:.1})",
            stats::home_matches(player),
            stats::home_average(player)
        ),
        format!(
            "Away Matches: {} (Avg: {:.1})",
            stats::away_matches(player),
            stats::away_average(player)
        ),
        format!("In Form: {in_form}"),
    ];
    if !trend.is_empty() {
        lines.push(format!("Recent: {trend}"));
    }
    lines.push(String::new());
    lines.push("Match History".to_string());

    if player.stats.is_empty() {
        lines.push("No match history available.".to_string());
        return lines.join("\n");
    }

    lines.push(format!(
        "{:<13} {:>5}  {:<16} {:<16} {}",
        "Date", "Score", "Opponent", "Venue", "Type"
    ));
    for stat in &player.stats {
        lines.push(format!(
            "{:<13} {:>5}  {:<16} {:<16} {}",
            format_date(&stat.date),
            stat.score,
            stat.opponent,
            stat.venue,
            if stat.is_home { "Home" } else { "Away" }
        ));
    }
    lines.join("\n")
}

/// Server statistics when fetched, otherwise computed locally.
pub fn team_stats_for(state: &AppState) -> TeamStats {
    state
        .team_stats
        .clone()
        .unwrap_or_else(|| stats::team_summary(state.store.players()))
}

pub fn team_stats_text(team: &TeamStats) -> String {
    format!(
        "Total Players: {}\nTotal Matches: {}\nTeam Average: {:.1}",
        team.total_players, team.total_matches, team.team_average
    )
}

pub fn role_averages_text(team: &TeamStats) -> String {
    if team.role_averages.is_empty() {
        return "No role data yet".to_string();
    }
    team.role_averages
        .iter()
        .map(|(role, avg)| format!("{:<10} {:>6.1}", role.label(), avg))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn player_option_label(player: &Player) -> String {
    format!("{} ({})", player.name, player.role)
}

/// Tells the user what a score means for the chosen player.
pub fn score_hint(players: &[Player], player_id: Option<u32>) -> String {
    match player_id.and_then(|id| players.iter().find(|p| p.id == id)) {
        Some(player) => format!("Enter {} for {}", player.role.score_unit(), player.name),
        None => "Enter runs for batsmen or wickets for bowlers".to_string(),
    }
}

pub fn delete_prompt_text(name: &str) -> String {
    format!(
        "Are you sure you want to delete \"{name}\"?\n\n\
         This action cannot be undone and will remove all match statistics for this player.\n\n\
         y: delete    n/Esc: cancel"
    )
}

pub fn toast_text(toast: &Toast) -> String {
    let tag = match toast.level {
        ToastLevel::Info => "INFO",
        ToastLevel::Success => "OK",
        ToastLevel::Error => "ERROR",
    };
    format!("[{tag}] {}", toast.message)
}

pub fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
