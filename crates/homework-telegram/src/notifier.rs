//! Telegram delivery for homework notifications.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::debug;

use homework_core::{Credentials, Notifier, Result, WatchError};

/// Sends notifications to one fixed Telegram chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    /// The teloxide bot instance.
    bot: Bot,
    /// Destination chat.
    recipient: Recipient,
    /// Destination as configured, for error context and logs.
    destination: String,
}

impl TelegramNotifier {
    /// Create a notifier for `chat_id` using the given bot token.
    ///
    /// Fails with [`WatchError::InvalidConfiguration`] when `chat_id` is
    /// neither a number nor an `@`-prefixed channel username.
    pub fn new(token: impl Into<String>, chat_id: &str) -> Result<Self> {
        let recipient = parse_recipient(chat_id).ok_or_else(|| WatchError::InvalidConfiguration {
            name: "TELEGRAM_CHAT_ID",
            value: chat_id.to_string(),
        })?;

        Ok(Self {
            bot: Bot::new(token),
            recipient,
            destination: chat_id.trim().to_string(),
        })
    }

    /// Create a notifier from the loaded credentials.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        Self::new(
            credentials.telegram_token.clone(),
            &credentials.telegram_chat_id,
        )
    }

    /// The destination chat.
    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self.bot.get_me().await.map_err(|e| self.delivery_failed(e))?;
        Ok(me.username().to_string())
    }

    fn delivery_failed(&self, e: teloxide::RequestError) -> WatchError {
        WatchError::DeliveryFailed {
            destination: self.destination.clone(),
            message: e.to_string(),
        }
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.bot
            .send_message(self.recipient.clone(), text)
            .await
            .map_err(|e| self.delivery_failed(e))?;

        debug!(chat = %self.destination, "Telegram message sent");
        Ok(())
    }
}

/// Interpret `TELEGRAM_CHAT_ID` as a numeric chat id or an `@channel` username.
pub fn parse_recipient(chat_id: &str) -> Option<Recipient> {
    let chat_id = chat_id.trim();
    if let Ok(id) = chat_id.parse::<i64>() {
        return Some(Recipient::Id(ChatId(id)));
    }
    match chat_id.strip_prefix('@') {
        Some(name) if !name.is_empty() => Some(Recipient::ChannelUsername(chat_id.to_string())),
        _ => None,
    }
}
