pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod http_client;
pub mod logging;
pub mod model;
pub mod provider;
pub mod state;
pub mod stats;
pub mod store;
pub mod view;

pub use api::CricketApi;
pub use error::{ApiError, ApiResult, ValidationError};
pub use model::{MatchStat, Player, Role, TeamStats, TopPerformer};
