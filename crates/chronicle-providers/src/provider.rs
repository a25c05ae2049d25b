use async_trait::async_trait;
use chrono::{DateTime, Utc};

use chronicle_types::ProviderFile;

use crate::error::ProviderResult;

/// An authenticated provider session.
#[derive(Clone, Debug)]
pub struct Session {
    /// Key of the provider that established the session.
    pub provider: String,
    /// When the session was verified.
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            established_at: Utc::now(),
        }
    }
}

/// The four-step acquisition contract every external data source implements.
///
/// The engine calls these in order: `verify`, `dispatch`, `poll_completion`
/// (repeatedly), `parse`. Implementations must be safe to call again after
/// a restart: `poll_completion` and `parse` may run in a fresh process long
/// after `dispatch` filed the export request.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable key identifying this provider (e.g. "spotify").
    fn key(&self) -> &str;

    /// Check for a valid session.
    ///
    /// Returns [`crate::ProviderError::AuthRequired`] when the user has to
    /// log in first; the engine surfaces that to the user instead of
    /// retrying.
    async fn verify(&self) -> ProviderResult<Session>;

    /// File an export request with the provider.
    async fn dispatch(&self) -> ProviderResult<()>;

    /// Check whether the filed export is ready for download.
    async fn poll_completion(&self) -> ProviderResult<bool>;

    /// Download and unpack the completed export into provider files.
    async fn parse(&self) -> ProviderResult<Vec<ProviderFile>>;
}
