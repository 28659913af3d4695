//! Homework Core - building blocks for the homework status bot.
//!
//! - **api**: Practicum `homework_statuses` client
//! - **config**: Credentials and file locations
//! - **error**: The `WatchError` enum shared by every crate
//! - **homework**: Status codes, verdicts, and notification text
//! - **notify**: `StatusSource` and `Notifier` traits
//! - **response**: Shape checks for the API response

pub mod api;
pub mod config;
pub mod error;
pub mod homework;
pub mod notify;
pub mod response;

pub use api::{PracticumClient, DEFAULT_TIMEOUT, ENDPOINT};
pub use config::{check_tokens, load_env_files, log_file, logs_dir, Credentials, EnvFileLoad};
pub use error::{Result, WatchError};
pub use homework::{parse_status, HomeworkRecord, HomeworkStatus};
pub use notify::{Notifier, StatusSource};
pub use response::{check_response, current_date};
