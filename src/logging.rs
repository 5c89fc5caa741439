//! # Structured Logging Module
//!
//! Environment-aware structured logging that writes human-readable output to
//! the console and, optionally, JSON lines to a log file.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ConfigManager;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console-only structured logging
pub fn init_structured_logging() {
    init_with_log_dir(None);
}

/// Initialize structured logging with an additional JSON file sink under `log_dir`
pub fn init_structured_logging_to_dir(log_dir: PathBuf) {
    init_with_log_dir(Some(log_dir));
}

fn init_with_log_dir(log_dir: Option<PathBuf>) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = ConfigManager::detect_environment();
        let log_level = get_log_level(&environment);

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(true)
            .with_filter(build_filter(&log_level));

        let (file_layer, guard, log_path) = match log_dir.and_then(prepare_log_dir) {
            Some(dir) => {
                let filename = format!(
                    "{}.{}.{}.log",
                    environment,
                    process::id(),
                    Utc::now().format("%Y%m%d_%H%M%S")
                );
                let log_path = dir.join(&filename);
                let appender = tracing_appender::rolling::never(&dir, filename);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(build_filter(&log_level));
                (Some(layer), Some(guard), Some(log_path))
            }
            None => (None, None, None),
        };

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        if subscriber.try_init().is_err() {
            // A global subscriber is already installed (tests, embedding host)
            tracing::debug!("Global tracing subscriber already initialized - continuing");
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            log_file = ?log_path,
            "🔧 STRUCTURED LOGGING: Initialized"
        );

        // The writer thread must outlive the process-wide subscriber
        if let Some(guard) = guard {
            std::mem::forget(guard);
        }
    });
}

fn prepare_log_dir(dir: PathBuf) -> Option<PathBuf> {
    if dir.exists() {
        return Some(dir);
    }
    match fs::create_dir_all(&dir) {
        Ok(()) => Some(dir),
        Err(e) => {
            eprintln!("Failed to create log directory {}: {e}", dir.display());
            None
        }
    }
}

/// `RUST_LOG` wins over the environment-derived level
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log the outcome of a single forum refresh
pub fn log_forum_refresh(forum_id: &str, status: &str, duration_ms: u64, error: Option<&str>) {
    tracing::info!(
        forum_id = %forum_id,
        status = %status,
        duration_ms = duration_ms,
        error = error,
        timestamp = %Utc::now().to_rfc3339(),
        "📡 FORUM_REFRESH"
    );
}

/// Log a rejected request
pub fn log_rate_limited(key: &str, limit: u32, reset_at: DateTime<Utc>) {
    tracing::warn!(
        client_key = %key,
        limit = limit,
        reset_at = %reset_at.to_rfc3339(),
        "🚦 RATE_LIMITED"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ ERROR"
    );
}
