// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Venue error: {0}")]
    Venue(#[from] VenueError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Unknown(s)
    }
}

/// Submission-path error taxonomy. Every failure surfaced to the panel is
/// one of these variants; nothing escapes as an unhandled rejection.
#[derive(Error, Debug)]
pub enum VenueError {
    #[error("Invalid order: {0}")]
    Validation(String),

    #[error("No liquidity on the {0} side of the book")]
    NoLiquidity(String),

    #[error("Insufficient collateral: required {required}, available {available}")]
    InsufficientCollateral { required: i128, available: i128 },

    #[error("Order would revert: {0}")]
    PreflightRevert(String),

    #[error("Transaction cancelled by user")]
    UserCancelled,

    #[error("Price moved outside slippage tolerance: {0}")]
    Slippage(String),

    #[error("Trading session error: {0}")]
    Session(String),

    #[error("Trading session required: enable trading before placing orders")]
    SessionRequired,

    #[error("Venue address not found for market {0}")]
    UnknownVenue(String),

    #[error("Submission failed: {0}")]
    Submission(String),
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("HTTP error: status {0}")]
    Status(u16),

    #[error("Response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Backend rejected order: {0}")]
    Rejected(String),
}

// Result type aliases for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type VenueResult<T> = Result<T, VenueError>;
pub type BackendResult<T> = Result<T, BackendError>;

/// Coarse class of a raw failure string coming back from a wallet provider,
/// RPC node or relay. Drives retry/abort decisions in the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Price tolerance exceeded; eligible for the widening retry ladder.
    Slippage,
    /// The user rejected the signing prompt; never retried.
    UserCancelled,
    /// The gasless session is expired or unknown to the relay.
    SessionInvalid,
    /// Anything else; surfaced as-is, not retried.
    Other,
}

/// Classify a raw provider/relay error message. Matching is substring-based
/// and case-insensitive because the underlying providers do not agree on
/// error codes.
pub fn classify_failure(raw: &str) -> FailureClass {
    let msg = raw.to_lowercase();
    if msg.contains("slippage")
        || msg.contains("price tolerance")
        || msg.contains("price out of range")
        || msg.contains("price bound")
    {
        FailureClass::Slippage
    } else if msg.contains("user rejected")
        || msg.contains("user denied")
        || msg.contains("rejected by user")
        || msg.contains("action_rejected")
    {
        FailureClass::UserCancelled
    } else if msg.contains("session expired")
        || msg.contains("invalid session")
        || msg.contains("session not found")
    {
        FailureClass::SessionInvalid
    } else {
        FailureClass::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_slippage_messages() {
        assert_eq!(
            classify_failure("execution reverted: Slippage limit reached"),
            FailureClass::Slippage
        );
        assert_eq!(
            classify_failure("PRICE BOUND exceeded"),
            FailureClass::Slippage
        );
    }

    #[test]
    fn classifies_user_rejection() {
        assert_eq!(
            classify_failure("MetaMask Tx Signature: User denied transaction signature."),
            FailureClass::UserCancelled
        );
        assert_eq!(
            classify_failure("ACTION_REJECTED"),
            FailureClass::UserCancelled
        );
    }

    #[test]
    fn classifies_session_errors() {
        assert_eq!(
            classify_failure("relay: session expired, re-authorize"),
            FailureClass::SessionInvalid
        );
    }

    #[test]
    fn unknown_messages_fall_through() {
        assert_eq!(classify_failure("nonce too low"), FailureClass::Other);
    }
}
