use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Player classification used for filtering and grouped statistics.
///
/// The backend stores roles as free text, so anything other than the two
/// known roles is kept verbatim instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Batsman,
    Bowler,
    Other(String),
}

impl Role {
    pub const CHOICES: [Role; 2] = [Role::Batsman, Role::Bowler];

    pub fn as_str(&self) -> &str {
        match self {
            Role::Batsman => "batsman",
            Role::Bowler => "bowler",
            Role::Other(raw) => raw.as_str(),
        }
    }

    /// Capitalized form used in headings ("Batsman", "Bowler").
    pub fn label(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// What a score means for this role.
    pub fn score_unit(&self) -> &'static str {
        match self {
            Role::Batsman => "runs",
            _ => "wickets",
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "batsman" => Role::Batsman,
            "bowler" => Role::Bowler,
            _ => Role::Other(raw),
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Role::from(raw.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One match entry owned by a player. `date` is kept exactly as the backend sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStat {
    pub date: String,
    pub score: i32,
    #[serde(default)]
    pub opponent: String,
    #[serde(default)]
    pub venue: String,
    /// A missing flag counts as an away match.
    #[serde(default)]
    pub is_home: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: Vec<MatchStat>,

    // Server-side summaries. Some backends send these instead of `stats`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_form: Option<bool>,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            stats: Vec::new(),
            matches: None,
            average: None,
            best_score: None,
            in_form: None,
        }
    }

    pub fn with_stats(mut self, stats: Vec<MatchStat>) -> Self {
        self.stats = stats;
        self
    }
}

/// Row of `/players/top` and `/players/form`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    #[serde(default)]
    pub id: Option<u32>,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub average: f64,
}

/// Body of `/stats`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    #[serde(default)]
    pub total_players: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_matches: u32,
    #[serde(default)]
    pub team_average: f64,
    #[serde(default, deserialize_with = "lenient_role_averages")]
    pub role_averages: BTreeMap<Role, f64>,
}

/// Body of `POST /players`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPlayer {
    pub name: String,
    pub role: Role,
}

/// Body of `POST /matches`. The backend resolves the player by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub player_name: String,
    pub date: String,
    pub score: i32,
    pub opponent: String,
    pub venue: String,
    pub is_home: bool,
}

/// `{ "error": "..." }` returned on rejected requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Accepts an object, a string holding an object (how the reference backend
// emits it), or null.
fn lenient_role_averages<'de, D>(deserializer: D) -> Result<BTreeMap<Role, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let value = match value {
        Value::String(raw) if raw.trim().is_empty() => return Ok(BTreeMap::new()),
        Value::String(raw) => serde_json::from_str(&raw).map_err(serde::de::Error::custom)?,
        other => other,
    };
    match value {
        Value::Null => Ok(BTreeMap::new()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}
