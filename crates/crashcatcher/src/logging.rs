//! Structured logging for the crash handler.
//!
//! Every event carries `component = "CRASH_HANDLER"` so operators can filter
//! handler diagnostics out of an application's own log stream.
//!
//! # Usage
//!
//! ```ignore
//! use crashcatcher::log_crash_warn;
//!
//! log_crash_warn!(
//!     "Report directory unavailable",
//!     path = tracing::field::display(dir.display()),
//! );
//! ```

/// Component identifiers for log filtering
pub struct Component;

impl Component {
    pub const CRASH_HANDLER: &'static str = "CRASH_HANDLER";
    pub const CLI: &'static str = "CLI";
}

/// Log levels for runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[macro_export]
macro_rules! log_crash_error {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::error!(component = "CRASH_HANDLER", $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_crash_warn {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(component = "CRASH_HANDLER", $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_crash_info {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(component = "CRASH_HANDLER", $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_crash_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = "CRASH_HANDLER", $($key = $value,)* $msg)
    };
}

/// Initialize logging with the given level filter.
/// Call this once at application startup; `RUST_LOG` takes precedence.
pub fn init_logging(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
