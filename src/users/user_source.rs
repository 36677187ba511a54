use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

use super::user::{User, UserId};

#[async_trait::async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_user(&self, id: UserId) -> Result<User, FetchError>;
}
pub type SharedUserSource = Arc<dyn UserSource>;

#[derive(Debug)]
pub enum FetchError {
    /// Request never produced a response (connection refused, timeout, ...)
    Network(reqwest::Error),
    /// Server answered with a non-2xx status
    HttpStatus(reqwest::StatusCode),
    /// Body is not a user
    Parse(serde_json::Error),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "network error: {}", e),
            FetchError::HttpStatus(status) => write!(f, "unexpected status: {}", status),
            FetchError::Parse(e) => write!(f, "malformed user: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Network(e) => Some(e),
            FetchError::HttpStatus(_) => None,
            FetchError::Parse(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e)
    }
}
