use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::http_client::http_client;
use crate::model::{ErrorBody, MatchStat, NewMatch, NewPlayer, Player, TeamStats, TopPerformer};

/// Typed client for the cricket stats REST backend.
///
/// Responses are taken as-is; the only shape checks are the ones serde does
/// while decoding.
#[derive(Debug, Clone)]
pub struct CricketApi {
    http: Client,
    base_url: String,
}

impl CricketApi {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Client using the shared http pool and the configured base url.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client(config.http_timeout)?.clone();
        Ok(Self::new(config.api_base_url.clone(), http))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /players`
    #[instrument(skip(self))]
    pub fn list_players(&self) -> ApiResult<Vec<Player>> {
        self.get_json("/players", parse_players_json)
    }

    /// `GET /players/top`
    #[instrument(skip(self))]
    pub fn top_players(&self) -> ApiResult<Vec<TopPerformer>> {
        self.get_json("/players/top", parse_performers_json)
    }

    /// `GET /players/form`
    #[instrument(skip(self))]
    pub fn players_in_form(&self) -> ApiResult<Vec<TopPerformer>> {
        self.get_json("/players/form", parse_performers_json)
    }

    /// `GET /stats`
    #[instrument(skip(self))]
    pub fn team_stats(&self) -> ApiResult<TeamStats> {
        self.get_json("/stats", parse_team_stats_json)
    }

    /// `POST /players`. Returns the created player when the server echoes it back.
    #[instrument(skip(self), fields(name = %player.name, role = %player.role))]
    pub fn create_player(&self, player: &NewPlayer) -> ApiResult<Option<Player>> {
        let url = self.url("/players");
        let body = self.execute(self.http.post(&url).json(player), &url)?;
        Ok(parse_optional(&body))
    }

    /// `POST /matches`. Returns the created stat when the server echoes it back.
    #[instrument(skip(self), fields(player = %entry.player_name, date = %entry.date))]
    pub fn add_match(&self, entry: &NewMatch) -> ApiResult<Option<MatchStat>> {
        let url = self.url("/matches");
        let body = self.execute(self.http.post(&url).json(entry), &url)?;
        Ok(parse_optional(&body))
    }

    /// `DELETE /players/{id}`. Only the status matters.
    #[instrument(skip(self))]
    pub fn delete_player(&self, id: u32) -> ApiResult<()> {
        let url = self.url(&format!("/players/{id}"));
        self.execute(self.http.delete(&url), &url)?;
        Ok(())
    }

    /// Cheap reachability check against the players endpoint.
    #[instrument(skip(self))]
    pub fn ping(&self) -> ApiResult<()> {
        let url = self.url("/players");
        self.execute(self.http.get(&url), &url)?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T>(
        &self,
        path: &str,
        parse: fn(&str) -> Result<T, serde_json::Error>,
    ) -> ApiResult<T> {
        let url = self.url(path);
        let body = self.execute(self.http.get(&url), &url)?;
        parse(&body).map_err(|source| ApiError::Decode { url, source })
    }

    fn execute(&self, request: RequestBuilder, url: &str) -> ApiResult<String> {
        let resp = request.send().map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })?;
        let status = resp.status();
        debug!(%status, url, "response");
        let body = resp.text().map_err(|source| ApiError::Body {
            url: url.to_string(),
            source,
        })?;
        if !status.is_success() {
            warn!(%status, url, body = %body, "request rejected");
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
                message: parse_error_message(&body),
            });
        }
        Ok(body)
    }
}

pub fn parse_players_json(raw: &str) -> Result<Vec<Player>, serde_json::Error> {
    parse_list(raw)
}

pub fn parse_performers_json(raw: &str) -> Result<Vec<TopPerformer>, serde_json::Error> {
    parse_list(raw)
}

pub fn parse_team_stats_json(raw: &str) -> Result<TeamStats, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(TeamStats::default());
    }
    serde_json::from_str(trimmed)
}

/// The `error` text of a rejection body, if there is one.
pub fn parse_error_message(raw: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(raw.trim())
        .ok()
        .and_then(|body| body.error)
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty())
}

fn parse_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed)
}

fn parse_optional<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_str(raw.trim()).ok()
}
