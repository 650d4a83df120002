use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{MatchStat, Player, Role, TeamStats};

pub const DEFAULT_TOP_COUNT: usize = 5;
pub const DEFAULT_RECENT_COUNT: usize = 5;
pub const FORM_WINDOW: usize = 3;

/// A match flattened out of its owner, tagged with the owner's name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecentMatch<'a> {
    pub player: &'a str,
    pub stat: &'a MatchStat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCounts {
    pub batsmen: usize,
    pub bowlers: usize,
}

fn mean<'a>(stats: impl Iterator<Item = &'a MatchStat>) -> f64 {
    let (total, count) = stats.fold((0i64, 0usize), |(total, count), stat| {
        (total + i64::from(stat.score), count + 1)
    });
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

// Averages are unrounded; display code formats them to one decimal.
pub fn average(player: &Player) -> f64 {
    mean(player.stats.iter())
}

pub fn best_score(player: &Player) -> i32 {
    player.stats.iter().map(|s| s.score).max().unwrap_or(0)
}

pub fn home_average(player: &Player) -> f64 {
    mean(player.stats.iter().filter(|s| s.is_home))
}

pub fn away_average(player: &Player) -> f64 {
    mean(player.stats.iter().filter(|s| !s.is_home))
}

pub fn home_matches(player: &Player) -> usize {
    player.stats.iter().filter(|s| s.is_home).count()
}

pub fn away_matches(player: &Player) -> usize {
    player.stats.len() - home_matches(player)
}

/// Matches played. Falls back to the server summary when no stats were sent.
pub fn matches_played(player: &Player) -> usize {
    if player.stats.is_empty() {
        return player.matches.map_or(0, |n| n as usize);
    }
    player.stats.len()
}

pub fn career_average(player: &Player) -> f64 {
    if player.stats.is_empty() {
        return player.average.unwrap_or(0.0);
    }
    average(player)
}

pub fn career_best(player: &Player) -> i32 {
    if player.stats.is_empty() {
        return player.best_score.unwrap_or(0);
    }
    best_score(player)
}

pub fn career_in_form(player: &Player) -> bool {
    if player.stats.is_empty() {
        return player.in_form.unwrap_or(false);
    }
    is_in_form(player)
}

/// Last `count` scores in stored order.
pub fn recent_scores(player: &Player, count: usize) -> Vec<i32> {
    let start = player.stats.len().saturating_sub(count);
    player.stats[start..].iter().map(|s| s.score).collect()
}

/// True when the mean of the last three entries beats the career mean.
///
/// "Last" is positional: the tail of `stats` as fetched, not the three most
/// recent dates.
pub fn is_in_form(player: &Player) -> bool {
    if player.stats.len() < FORM_WINDOW {
        return false;
    }
    let start = player.stats.len() - FORM_WINDOW;
    mean(player.stats[start..].iter()) > average(player)
}

pub fn players_in_form(players: &[Player]) -> Vec<&Player> {
    players.iter().filter(|p| is_in_form(p)).collect()
}

/// Mean of per-player averages. Not weighted by matches played.
pub fn team_average(players: &[Player]) -> f64 {
    if players.is_empty() {
        return 0.0;
    }
    players.iter().map(average).sum::<f64>() / players.len() as f64
}

pub fn total_matches(players: &[Player]) -> usize {
    players.iter().map(|p| p.stats.len()).sum()
}

/// Players ranked by average, best first. Equal averages keep roster order.
pub fn top_performers(players: &[Player], count: usize) -> Vec<(&Player, f64)> {
    let mut ranked: Vec<(&Player, f64)> = players.iter().map(|p| (p, average(p))).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(count);
    ranked
}

/// Every match across the roster, newest calendar date first.
///
/// Dates that do not parse sort after all dated entries.
pub fn recent_matches(players: &[Player], count: usize) -> Vec<RecentMatch<'_>> {
    let mut all: Vec<RecentMatch<'_>> = players
        .iter()
        .flat_map(|player| {
            player.stats.iter().map(move |stat| RecentMatch {
                player: player.name.as_str(),
                stat,
            })
        })
        .collect();
    all.sort_by_cached_key(|m| Reverse(parse_match_date(&m.stat.date)));
    all.truncate(count);
    all
}

/// Mean of per-player averages within each role.
pub fn role_averages(players: &[Player]) -> BTreeMap<Role, f64> {
    let mut sums: BTreeMap<Role, (f64, usize)> = BTreeMap::new();
    for player in players {
        let entry = sums.entry(player.role.clone()).or_insert((0.0, 0));
        entry.0 += average(player);
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(role, (sum, count))| (role, sum / count as f64))
        .collect()
}

pub fn role_counts(players: &[Player]) -> RoleCounts {
    players
        .iter()
        .fold(RoleCounts::default(), |mut counts, player| {
            match player.role {
                Role::Batsman => counts.batsmen += 1,
                Role::Bowler => counts.bowlers += 1,
                Role::Other(_) => {}
            }
            counts
        })
}

/// Parses the date formats a match-entry form or the backend produce.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];

    let cleaned = raw.trim();
    // Tolerate timestamps like 2024-03-05T10:00:00.
    let date_part = cleaned.split(['T', ' ']).next().unwrap_or(cleaned);
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// The `/stats` summary computed from a local roster.
pub fn team_summary(players: &[Player]) -> TeamStats {
    TeamStats {
        total_players: players.len() as u32,
        total_matches: total_matches(players) as u32,
        team_average: team_average(players),
        role_averages: role_averages(players),
    }
}
