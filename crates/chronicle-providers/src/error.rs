use thiserror::Error;

/// Errors raised by providers and the acquisition engine.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider has no valid session. Terminal and user-actionable
    /// (a login is required); never retried automatically.
    #[error("provider '{provider}' requires authentication")]
    AuthRequired { provider: String },

    /// A provider-specific acquisition step failed.
    #[error("acquisition failed for '{provider}': {reason}")]
    Acquisition { provider: String, reason: String },

    /// Lifecycle state could not be persisted or restored.
    #[error("lifecycle state for '{provider}' is malformed: {reason}")]
    MalformedState { provider: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
