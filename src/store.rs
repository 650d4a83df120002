use std::sync::Arc;
use std::time::SystemTime;

use crate::model::Player;
use crate::stats;

/// The roster as last fetched from the backend.
///
/// The store never edits players in place. Every reload swaps in a new
/// snapshot, so a clone taken earlier keeps the roster it was taken from.
#[derive(Debug, Clone)]
pub struct PlayerStore {
    players: Arc<[Player]>,
    loaded_at: Option<SystemTime>,
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStore {
    pub fn new() -> Self {
        Self {
            players: Arc::from(Vec::new()),
            loaded_at: None,
        }
    }

    pub fn replace(&mut self, players: Vec<Player>) {
        self.players = Arc::from(players);
        self.loaded_at = Some(SystemTime::now());
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn loaded_at(&self) -> Option<SystemTime> {
        self.loaded_at
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn find(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn total_matches(&self) -> usize {
        stats::total_matches(&self.players)
    }

    pub fn team_average(&self) -> f64 {
        stats::team_average(&self.players)
    }

    /// Case-insensitive substring match over name or role.
    pub fn search(&self, term: &str) -> Vec<&Player> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.players.iter().collect();
        }
        self.players
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.role.as_str().to_lowercase().contains(&needle)
            })
            .collect()
    }
}
