use thiserror::Error;

/// Failure taxonomy surfaced by every domain service.
///
/// The REST layer maps each variant to an HTTP status; nothing is silently
/// swallowed apart from referral-code collision retries, which are bounded
/// and retried inside the affiliate service.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-range input, safe to show to the caller.
    #[error("{0}")]
    Validation(String),

    /// The session lacks the role the operation requires.
    #[error("{0}")]
    Forbidden(String),

    /// The entity exists but is not in an actionable state.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Storage or other internal failure; logged, reported generically.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        DomainError::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DomainError::NotFound(msg.into())
    }
}
