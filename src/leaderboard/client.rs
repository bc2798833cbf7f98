//! HTTP client for the remote score store.
//!
//! `POST {endpoint}` with `{"score": n}` saves a finished run,
//! `GET {endpoint}` returns the best scores, best first.

use super::types::{decode_records, ScoreRecord};
use std::error::Error;
use std::fmt;
use std::time::Duration;

const USER_AGENT: &str = concat!("dino-runner/", env!("CARGO_PKG_VERSION"));

/// Why a leaderboard request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    /// Connection, DNS, TLS, or I/O failure before a response arrived.
    Transport(String),
    /// The server answered with a non-success status code.
    Status(u16),
    /// The response body could not be read.
    Decode(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "network error: {}", msg),
            Self::Status(code) => write!(f, "server returned HTTP {}", code),
            Self::Decode(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

impl Error for LeaderboardError {}

impl From<ureq::Error> for LeaderboardError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::Status(code),
            ureq::Error::Transport(t) => Self::Transport(t.to_string()),
        }
    }
}

/// The two operations the game needs from a leaderboard.
pub trait ScoreService: Send + Sync {
    fn submit(&self, score: u32) -> Result<(), LeaderboardError>;
    fn fetch_top(&self) -> Result<Vec<ScoreRecord>, LeaderboardError>;
}

/// `ScoreService` backed by a JSON endpoint.
pub struct HttpScoreService {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpScoreService {
    /// `timeout` of `None` waits as long as the server takes.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            endpoint: endpoint.into(),
            agent: builder.build(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{scheme}://{host}/health` for the configured endpoint.
    pub fn health_url(&self) -> String {
        format!("{}/health", origin_of(&self.endpoint))
    }

    /// Ping the backend's health route. Returns the response body.
    pub fn check_health(&self) -> Result<String, LeaderboardError> {
        let response = self.agent.get(&self.health_url()).call()?;
        response
            .into_string()
            .map(|body| body.trim().to_string())
            .map_err(|e| LeaderboardError::Decode(e.to_string()))
    }
}

impl ScoreService for HttpScoreService {
    fn submit(&self, score: u32) -> Result<(), LeaderboardError> {
        self.agent
            .post(&self.endpoint)
            .send_json(ureq::json!({ "score": score }))?;
        Ok(())
    }

    fn fetch_top(&self) -> Result<Vec<ScoreRecord>, LeaderboardError> {
        let response = self.agent.get(&self.endpoint).call()?;
        match response.into_json::<serde_json::Value>() {
            Ok(body) => Ok(decode_records(body)),
            Err(e) => {
                log::warn!("Leaderboard body was not JSON: {}", e);
                Ok(Vec::new())
            }
        }
    }
}

/// Scheme and authority of a URL, without path.
/// Format: "http://host:8080/api/scores" -> "http://host:8080"
fn origin_of(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[after_scheme..].find('/') {
        Some(slash) => &url[..after_scheme + slash],
        None => url.trim_end_matches('/'),
    }
}
