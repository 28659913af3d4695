//! Seams between the polling loop and the outside world.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Something that answers homework status queries.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch statuses changed since `from_date` (Unix seconds).
    async fn fetch(&self, from_date: i64) -> Result<Value>;
}

/// Delivers text to the bot's fixed destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message.
    ///
    /// Failures surface as [`crate::WatchError::DeliveryFailed`].
    async fn send(&self, text: &str) -> Result<()>;
}
