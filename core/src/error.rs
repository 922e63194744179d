//! Error types for the blog client core.
//!
//! # Design
//! `RequestError` is the single failure surface of `ApiClient::parse`. Its
//! `Display` text is exactly what the shell shows in the message slot, so
//! the variants carry user-facing strings rather than raw bodies.
//! Storage and token failures never reach the user; they are logged and
//! resolved by discarding the credential.

/// Fallback text when an error response has no `error` field.
pub const GENERIC_FAILURE: &str = "API request failed";

/// Errors produced while building or interpreting an API round-trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The body could not be parsed as JSON. Carries the HTTP status.
    #[error("API request failed, status code: {0}")]
    Status(u16),

    /// A well-formed JSON error response; the message is the body's `error`
    /// field or `GENERIC_FAILURE`.
    #[error("{0}")]
    Api(String),

    /// The host could not complete the round-trip at all.
    #[error("API request failed: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Failures of the persistent token store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a stored credential token cannot be turned into a `User`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),
}
