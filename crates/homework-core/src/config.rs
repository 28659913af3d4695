//! Credentials and file locations for the homework bot.
//!
//! # Storage Structure
//!
//! Files live under `~/.homework-bot/`:
//!
//! ```text
//! ~/.homework-bot/
//! ├── config/       # .env with the bot credentials
//! └── logs/         # main.log, truncated on every start
//! ```
//!
//! # Environment Variables
//!
//! Required:
//! - `PRACTICUM_TOKEN`: OAuth token for the Practicum API
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Chat that receives the notifications
//!
//! Optional:
//! - `HOMEWORK_BOT_STATE_DIR`: Override the base directory

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::error;

use crate::error::{Result, WatchError};

/// Environment variable holding the Practicum API token.
pub const PRACTICUM_TOKEN_ENV: &str = "PRACTICUM_TOKEN";

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";

/// Environment variable holding the destination chat.
pub const TELEGRAM_CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Environment variable for a custom state directory.
pub const STATE_DIR_ENV: &str = "HOMEWORK_BOT_STATE_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".homework-bot";

const CONFIG_SUBDIR: &str = "config";
const LOGS_SUBDIR: &str = "logs";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the bot's state directory.
///
/// Resolved from `HOMEWORK_BOT_STATE_DIR`, then `~/.homework-bot`, then
/// `.homework-bot` in the current directory.
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the config directory.
pub fn config_dir() -> PathBuf {
    state_dir().join(CONFIG_SUBDIR)
}

/// Get the logs directory.
pub fn logs_dir() -> PathBuf {
    state_dir().join(LOGS_SUBDIR)
}

/// Get the `.env` file holding the credentials.
pub fn env_file() -> PathBuf {
    config_dir().join(".env")
}

/// Get the default log file path.
pub fn log_file() -> PathBuf {
    logs_dir().join("main.log")
}

/// Result of reading one `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFileLoad {
    /// File that was read.
    pub path: PathBuf,
    /// Why the file could not be applied, if it failed.
    pub error: Option<String>,
}

/// Load `.env` files into the process environment.
///
/// The config directory file is read first, then `.env` in the working
/// directory. Variables already set in the environment are never overridden.
/// Runs before logging is configured, so the caller logs the returned
/// outcomes once tracing is up.
pub fn load_env_files() -> Vec<EnvFileLoad> {
    let mut loads = load_env_from(&[env_file()]);
    match dotenvy::dotenv() {
        Ok(path) => loads.push(EnvFileLoad { path, error: None }),
        Err(e) if e.not_found() => {}
        Err(e) => loads.push(EnvFileLoad {
            path: PathBuf::from(".env"),
            error: Some(e.to_string()),
        }),
    }
    loads
}

/// Load each existing file in `paths`, skipping the ones that do not exist.
pub fn load_env_from<P: AsRef<Path>>(paths: &[P]) -> Vec<EnvFileLoad> {
    paths
        .iter()
        .map(|path| -> &Path { path.as_ref() })
        .filter(|path| path.exists())
        .map(|path| EnvFileLoad {
            path: path.to_path_buf(),
            error: dotenvy::from_path(path).err().map(|e| e.to_string()),
        })
        .collect()
}

/// The three secrets the bot needs to run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth token for the Practicum API.
    pub practicum_token: String,
    /// Telegram bot token.
    pub telegram_token: String,
    /// Destination chat identifier.
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Read the credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        check_tokens(
            std::env::var(PRACTICUM_TOKEN_ENV).ok(),
            std::env::var(TELEGRAM_TOKEN_ENV).ok(),
            std::env::var(TELEGRAM_CHAT_ID_ENV).ok(),
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &mask(&self.practicum_token))
            .field("telegram_token", &mask(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

fn mask(s: &str) -> String {
    match s.get(..3) {
        Some(prefix) if s.len() > 6 => format!("{prefix}***"),
        _ => "***".into(),
    }
}

/// Verify that every required credential is present and non-empty.
///
/// Logs the full list of missing variables and returns
/// [`WatchError::ConfigurationMissing`] when any is absent.
pub fn check_tokens(
    practicum_token: Option<String>,
    telegram_token: Option<String>,
    telegram_chat_id: Option<String>,
) -> Result<Credentials> {
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let practicum_token = present(practicum_token);
    let telegram_token = present(telegram_token);
    let telegram_chat_id = present(telegram_chat_id);

    let missing: Vec<String> = [
        (PRACTICUM_TOKEN_ENV, practicum_token.is_none()),
        (TELEGRAM_TOKEN_ENV, telegram_token.is_none()),
        (TELEGRAM_CHAT_ID_ENV, telegram_chat_id.is_none()),
    ]
    .into_iter()
    .filter(|(_, absent)| *absent)
    .map(|(name, _)| name.to_string())
    .collect();

    match (practicum_token, telegram_token, telegram_chat_id) {
        (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)) => Ok(Credentials {
            practicum_token,
            telegram_token,
            telegram_chat_id,
        }),
        _ => {
            error!(
                missing = %missing.join(", "),
                "Required environment variables are missing at startup"
            );
            Err(WatchError::ConfigurationMissing { names: missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_all_tokens_present() {
        let creds = check_tokens(some("practicum"), some("telegram"), some("12345")).unwrap();
        assert_eq!(creds.practicum_token, "practicum");
        assert_eq!(creds.telegram_token, "telegram");
        assert_eq!(creds.telegram_chat_id, "12345");
    }

    #[test]
    fn test_each_missing_token_fails() {
        let cases = [
            (None, some("t"), some("c"), PRACTICUM_TOKEN_ENV),
            (some("p"), None, some("c"), TELEGRAM_TOKEN_ENV),
            (some("p"), some("t"), None, TELEGRAM_CHAT_ID_ENV),
        ];

        for (practicum, telegram, chat, name) in cases {
            let err = check_tokens(practicum, telegram, chat).unwrap_err();
            assert_eq!(
                err,
                WatchError::ConfigurationMissing {
                    names: vec![name.to_string()]
                }
            );
            assert!(err.is_fatal());
        }
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let err = check_tokens(some(""), some("  "), some("c")).unwrap_err();
        assert_eq!(
            err,
            WatchError::ConfigurationMissing {
                names: vec![PRACTICUM_TOKEN_ENV.to_string(), TELEGRAM_TOKEN_ENV.to_string()]
            }
        );
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = check_tokens(
            some("y0_AgAAAAsecret"),
            some("123456:ABCdef"),
            some("42"),
        )
        .unwrap();
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("ABCdef"));
        assert!(rendered.contains("y0_***"));
        assert_eq!(mask("short"), "***");
    }

    #[test]
    fn test_env_file_loads_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join(".env");
        std::fs::write(&present, "HOMEWORK_BOT_ENV_FILE_TEST=from-file\n").unwrap();
        let absent = dir.path().join("missing.env");

        let loads = load_env_from(&[absent, present.clone()]);

        assert_eq!(
            loads,
            vec![EnvFileLoad {
                path: present,
                error: None,
            }]
        );
        assert_eq!(
            std::env::var("HOMEWORK_BOT_ENV_FILE_TEST").as_deref(),
            Ok("from-file")
        );
    }

    #[test]
    fn test_unreadable_env_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join(".env");
        std::fs::write(&broken, "HOMEWORK_BOT_BROKEN='unterminated\n").unwrap();

        let loads = load_env_from(&[&broken]);

        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].path, broken);
        assert!(loads[0].error.is_some());
    }

    #[test]
    fn test_path_names() {
        assert!(config_dir().ends_with("config"));
        assert!(logs_dir().ends_with("logs"));
        assert!(env_file().ends_with(".env"));
        assert!(log_file().ends_with("main.log"));
    }
}
