//! Polling runtime for the homework bot.
//!
//! - `RuntimeConfig` - poll interval and first-run lookback window
//! - `StatusPoller` - polls a `StatusSource` and reports through a `Notifier`
//!
//! # Example
//!
//! ```ignore
//! use homework_core::{Credentials, PracticumClient, DEFAULT_TIMEOUT};
//! use homework_runtime::{RuntimeConfig, StatusPoller};
//! use std::sync::Arc;
//! use tokio::sync::watch;
//!
//! let credentials = Credentials::from_env()?;
//! let source = Arc::new(PracticumClient::new(&credentials.practicum_token, DEFAULT_TIMEOUT)?);
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! let mut poller = StatusPoller::new(source, notifier, RuntimeConfig::default(), shutdown_rx);
//!
//! tokio::spawn(async move { poller.run().await });
//! tokio::signal::ctrl_c().await?;
//! shutdown_tx.send(true)?;
//! ```
//!
//! Every cycle queries the source, validates the response, translates the
//! newest record, and sends it when it differs from the last delivered text.
//! Failures are logged and reported to the chat once per distinct error.

pub mod config;
pub mod poller;

pub use config::RuntimeConfig;
pub use poller::{CycleOutcome, StatusPoller};
