//! Telegram interface for the homework status bot.
//!
//! Polls the Practicum API and posts review status changes to one chat.
//!
//! # Environment Variables
//!
//! Required:
//! - `PRACTICUM_TOKEN`: Practicum OAuth token
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Numeric chat id or `@channel` username
//!
//! # Example
//!
//! ```no_run
//! use homework_core::Notifier;
//! use homework_telegram::TelegramNotifier;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let notifier = TelegramNotifier::new("123456:bot-token", "42")?;
//!     notifier.send("Hello from the homework bot").await?;
//!     Ok(())
//! }
//! ```

pub mod notifier;

pub use notifier::{parse_recipient, TelegramNotifier};
