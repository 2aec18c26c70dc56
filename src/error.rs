/// Domain-specific error types for the auction engine.
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("Auction not found: {0}")]
    NotFound(u64),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Outside auction window: {0}")]
    WindowViolation(String),

    #[error("Bid declined: {0}")]
    Declined(String),

    #[error("Conditional update lost a race: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Storage failure: {0}")]
    Store(anyhow::Error),
}

impl AuctionError {
    /// Wrap a storage-layer failure without losing its chain.
    pub fn store(err: anyhow::Error) -> Self {
        Self::Store(err)
    }

    /// Whether this outcome is an expected decline rather than a fault
    /// (a too-low bid, or a conditional update that lost its race).
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Convenience type alias.
pub type AuctionResult<T> = Result<T, AuctionError>;
