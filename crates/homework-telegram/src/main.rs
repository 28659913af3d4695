//! Homework status bot binary.
//!
//! Start the bot with:
//! ```bash
//! PRACTICUM_TOKEN=xxx TELEGRAM_TOKEN=xxx TELEGRAM_CHAT_ID=xxx cargo run -p homework-telegram
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use homework_core::{load_env_files, log_file, Credentials, PracticumClient};
use homework_runtime::{CycleOutcome, RuntimeConfig, StatusPoller};
use homework_telegram::TelegramNotifier;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Homework status bot - posts Practicum review updates to Telegram
#[derive(Parser, Debug)]
#[command(name = "homework-bot")]
#[command(about = "Polls Practicum homework statuses and notifies a Telegram chat")]
struct Args {
    /// Seconds between polls
    #[arg(short, long, default_value = "600", value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Days the first query reaches back
    #[arg(long, default_value = "30")]
    lookback_days: u64,

    /// HTTP timeout in seconds for Practicum requests
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Log file, truncated on start (default: ~/.homework-bot/logs/main.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(long, conflicts_with = "log_file")]
    stderr: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Before tracing, so RUST_LOG from a .env file takes effect.
    let env_loads = load_env_files();

    if let Err(e) = init_tracing(&args) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    for load in &env_loads {
        match &load.error {
            None => debug!(path = %load.path.display(), "Loaded env file"),
            Some(e) => warn!(path = %load.path.display(), error = %e, "Failed to load env file"),
        }
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Bot stopped");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(args: &Args) -> std::io::Result<()> {
    let default_filter = match args.verbose {
        0 => "homework_telegram=info,homework_runtime=info,homework_core=info,teloxide=warn",
        1 => "homework_telegram=debug,homework_runtime=debug,homework_core=debug,teloxide=info",
        2 => "homework_telegram=trace,homework_runtime=trace,homework_core=trace,teloxide=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if args.stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    let path = args.log_file.clone().unwrap_or_else(log_file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Credentials::from_env()?;
    info!(credentials = ?credentials, "Credentials loaded");

    let source = Arc::new(PracticumClient::new(
        credentials.practicum_token.clone(),
        Duration::from_secs(args.timeout),
    )?);
    let notifier = Arc::new(TelegramNotifier::from_credentials(&credentials)?);

    match notifier.get_me().await {
        Ok(username) => info!(username = %username, "Bot initialized successfully"),
        Err(e) => warn!(error = %e, "Failed to get bot info, continuing"),
    }

    let config = RuntimeConfig::new()
        .with_poll_interval(Duration::from_secs(args.interval))
        .with_lookback(Duration::from_secs(args.lookback_days.saturating_mul(24 * 3600)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut poller = StatusPoller::new(source, notifier, config, shutdown_rx);

    if args.once {
        return match poller.poll_once().await {
            CycleOutcome::Failed(e) => Err(e.into()),
            outcome => {
                info!(outcome = ?outcome, "Single poll finished");
                Ok(())
            }
        };
    }

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                // Keep the sender alive so the poller is not stopped.
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    });

    poller.run().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["homework-bot"]).unwrap();
        assert_eq!(args.interval, 600);
        assert_eq!(args.lookback_days, 30);
        assert_eq!(args.timeout, 30);
        assert!(!args.once);
        assert!(!args.stderr);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Args::try_parse_from(["homework-bot", "--interval", "0"]).is_err());
    }

    #[test]
    fn test_stderr_conflicts_with_log_file() {
        let result = Args::try_parse_from(["homework-bot", "--stderr", "--log-file", "bot.log"]);
        assert!(result.is_err());
    }
}
