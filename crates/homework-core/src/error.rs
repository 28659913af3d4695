//! Error types for the homework bot.

use thiserror::Error;

/// Errors that can occur while checking and reporting homework statuses.
///
/// Every variant carries owned, comparable context so that two failures of
/// the same kind with the same details compare equal. The poller relies on
/// this to avoid reporting an identical error to the chat twice in a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchError {
    /// One or more required environment variables are absent or empty.
    #[error("missing required environment variables: {}", .names.join(", "))]
    ConfigurationMissing { names: Vec<String> },

    /// A required environment variable holds a value that cannot be used.
    #[error("invalid value for {name}: {value}")]
    InvalidConfiguration { name: &'static str, value: String },

    /// The request never produced an HTTP response.
    #[error("request to endpoint {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The endpoint answered with a non-200 status.
    #[error("endpoint {endpoint} is unavailable, API response code: {status}")]
    BadStatus { endpoint: String, status: u16 },

    /// The response body could not be decoded as JSON.
    #[error("endpoint {endpoint} returned a body that is not JSON: {message}")]
    MalformedBody { endpoint: String, message: String },

    /// A value had the wrong JSON type.
    #[error("unexpected type for {what}: expected {expected}")]
    TypeMismatch {
        what: &'static str,
        expected: &'static str,
    },

    /// Required keys were absent from a JSON object.
    #[error("{what} is missing keys: {}", .keys.join(", "))]
    MissingKey {
        what: &'static str,
        keys: Vec<&'static str>,
    },

    /// The homework status is not one of the known verdict codes.
    #[error("unexpected homework status: {status}")]
    UnknownStatus { status: String },

    /// The notification could not be delivered.
    #[error("failed to send message to {destination}: {message}")]
    DeliveryFailed { destination: String, message: String },
}

impl WatchError {
    /// Whether this error must stop the process instead of the current cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WatchError::ConfigurationMissing { .. } | WatchError::InvalidConfiguration { .. }
        )
    }
}

/// Result type for homework bot operations.
pub type Result<T> = std::result::Result<T, WatchError>;
