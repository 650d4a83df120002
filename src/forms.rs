use crate::error::ValidationError;
use crate::model::{NewMatch, NewPlayer, Player, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerField {
    Name,
    Role,
}

/// "Add player" form.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerForm {
    pub name: String,
    pub role: Option<Role>,
    pub focus: PlayerField,
}

impl Default for PlayerForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            role: None,
            focus: PlayerField::Name,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            PlayerField::Name => PlayerField::Role,
            PlayerField::Role => PlayerField::Name,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus_next();
    }

    pub fn push_char(&mut self, ch: char) {
        if self.focus == PlayerField::Name {
            self.name.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.focus == PlayerField::Name {
            self.name.pop();
        }
    }

    pub fn cycle_choice(&mut self, forward: bool) {
        if self.focus == PlayerField::Role {
            self.role = cycle_role(self.role.as_ref(), forward);
        }
    }

    /// Both fields are required; nothing is sent until they are filled.
    pub fn validate(&self) -> Result<NewPlayer, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        let role = self
            .role
            .clone()
            .ok_or(ValidationError::MissingField("role"))?;
        Ok(NewPlayer {
            name: name.to_string(),
            role,
        })
    }
}

fn cycle_role(current: Option<&Role>, forward: bool) -> Option<Role> {
    let choices = Role::CHOICES;
    let idx = current.and_then(|role| choices.iter().position(|c| c == role));
    let next = match (idx, forward) {
        (None, true) => 0,
        (None, false) => choices.len() - 1,
        (Some(i), true) => (i + 1) % choices.len(),
        (Some(i), false) => (i + choices.len() - 1) % choices.len(),
    };
    choices.get(next).cloned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Player,
    Date,
    Score,
    Opponent,
    Venue,
    Kind,
}

impl MatchField {
    const ORDER: [MatchField; 6] = [
        MatchField::Player,
        MatchField::Date,
        MatchField::Score,
        MatchField::Opponent,
        MatchField::Venue,
        MatchField::Kind,
    ];

    fn step(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        Self::ORDER[next]
    }
}

/// "Add match" form. The player is picked by id from the current roster.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchForm {
    pub player_id: Option<u32>,
    pub date: String,
    pub score: String,
    pub opponent: String,
    pub venue: String,
    pub is_home: bool,
    pub focus: MatchField,
}

impl Default for MatchForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchForm {
    pub fn new() -> Self {
        Self {
            player_id: None,
            date: String::new(),
            score: String::new(),
            opponent: String::new(),
            venue: String::new(),
            is_home: true,
            focus: MatchField::Player,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.step(true);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.step(false);
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            MatchField::Date => Some(&mut self.date),
            MatchField::Score => Some(&mut self.score),
            MatchField::Opponent => Some(&mut self.opponent),
            MatchField::Venue => Some(&mut self.venue),
            MatchField::Player | MatchField::Kind => None,
        }
    }

    pub fn push_char(&mut self, ch: char) {
        if let Some(text) = self.focused_text() {
            text.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    /// Left/right on a choice field: walk the roster or flip home/away.
    pub fn cycle_choice(&mut self, players: &[Player], forward: bool) {
        match self.focus {
            MatchField::Player => self.player_id = cycle_player(players, self.player_id, forward),
            MatchField::Kind => self.is_home = !self.is_home,
            _ => {}
        }
    }

    /// Drops a selection that no longer exists after a reload.
    pub fn retain_player(&mut self, players: &[Player]) {
        if let Some(id) = self.player_id
            && !players.iter().any(|p| p.id == id)
        {
            self.player_id = None;
        }
    }

    /// Resolves the selected player against `players` and builds the request body.
    pub fn build(&self, players: &[Player]) -> Result<NewMatch, ValidationError> {
        let player = self
            .player_id
            .and_then(|id| players.iter().find(|p| p.id == id))
            .ok_or(ValidationError::PlayerNotFound)?;
        let score_raw = self.score.trim();
        let score = score_raw
            .parse::<i32>()
            .map_err(|_| ValidationError::InvalidScore(score_raw.to_string()))?;
        Ok(NewMatch {
            player_name: player.name.clone(),
            date: self.date.trim().to_string(),
            score,
            opponent: self.opponent.trim().to_string(),
            venue: self.venue.trim().to_string(),
            is_home: self.is_home,
        })
    }
}

fn cycle_player(players: &[Player], current: Option<u32>, forward: bool) -> Option<u32> {
    if players.is_empty() {
        return None;
    }
    let len = players.len();
    let idx = current.and_then(|id| players.iter().position(|p| p.id == id));
    let next = match (idx, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    };
    players.get(next).map(|p| p.id)
}
