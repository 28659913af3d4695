//! Status poller that turns homework status changes into chat messages.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use homework_core::{check_response, current_date, parse_status, Notifier, StatusSource, WatchError};

use crate::config::RuntimeConfig;

/// What a single poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The response held no homework records.
    NoUpdates,
    /// The latest status was already delivered.
    Unchanged,
    /// A notification with this text was delivered.
    Notified(String),
    /// The cycle failed; the error was logged and possibly reported.
    Failed(WatchError),
}

/// Polls the status source and notifies on changes.
///
/// The cursor starts at `now - lookback` and follows the server's
/// `current_date` after every successful cycle. A failed cycle leaves the
/// cursor where it was so the same window is queried again.
pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    config: RuntimeConfig,
    /// Shutdown signal receiver.
    shutdown: watch::Receiver<bool>,
    cursor: Option<i64>,
    last_message: Option<String>,
    last_error: Option<WatchError>,
}

impl StatusPoller {
    /// Creates a new status poller.
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        config: RuntimeConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            notifier,
            config,
            shutdown,
            cursor: None,
            last_message: None,
            last_error: None,
        }
    }

    /// The `from_date` the next query will use.
    pub fn cursor(&self) -> i64 {
        self.cursor.unwrap_or_else(|| self.initial_cursor())
    }

    fn initial_cursor(&self) -> i64 {
        let lookback = i64::try_from(self.config.lookback.as_secs()).unwrap_or(i64::MAX);
        chrono::Utc::now().timestamp().saturating_sub(lookback)
    }

    /// The last error that was successfully reported to the chat.
    pub fn last_reported_error(&self) -> Option<&WatchError> {
        self.last_error.as_ref()
    }

    /// Run the polling loop until the shutdown signal.
    ///
    /// The first poll happens immediately; each later poll starts
    /// `poll_interval` after the previous one finished.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = self.shutdown.clone();

        info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            lookback_secs = self.config.lookback.as_secs(),
            "starting status poller"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                    ticker.reset();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("poller received shutdown signal");
                        break;
                    }
                }
            }
        }

        info!("status poller stopped");
    }

    /// Run one poll cycle.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        match self.check_for_update().await {
            Ok(outcome) => {
                self.last_error = None;
                outcome
            }
            Err(e) => {
                self.report_failure(&e).await;
                CycleOutcome::Failed(e)
            }
        }
    }

    async fn check_for_update(&mut self) -> homework_core::Result<CycleOutcome> {
        // Pinned on first use; failures before the first success reuse it.
        let from_date = match self.cursor {
            Some(cursor) => cursor,
            None => {
                let initial = self.initial_cursor();
                self.cursor = Some(initial);
                initial
            }
        };
        let response = self.source.fetch(from_date).await?;
        let homeworks = check_response(&response)?;

        let outcome = match homeworks.first() {
            None => {
                debug!(from_date, "No new statuses in API response");
                CycleOutcome::NoUpdates
            }
            Some(homework) => {
                let message = parse_status(homework)?;
                if self.last_message.as_deref() == Some(message.as_str()) {
                    debug!("Homework status unchanged since last notification");
                    CycleOutcome::Unchanged
                } else {
                    self.notifier.send(&message).await?;
                    info!(message = %message, "Homework status notification sent");
                    self.last_message = Some(message.clone());
                    CycleOutcome::Notified(message)
                }
            }
        };

        if let Some(next) = current_date(&response) {
            if self.cursor != Some(next) {
                debug!(cursor = next, "Advancing cursor");
            }
            self.cursor = Some(next);
        }

        Ok(outcome)
    }

    async fn report_failure(&mut self, failure: &WatchError) {
        error!(error = %failure, "Homework status check failed");

        if self.last_error.as_ref() == Some(failure) {
            debug!("Error already reported to chat");
            return;
        }

        match self.notifier.send(&failure.to_string()).await {
            Ok(()) => self.last_error = Some(failure.clone()),
            Err(e) => warn!(error = %e, "Failed to report error to chat"),
        }
    }
}
