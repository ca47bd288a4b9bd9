//! Structured logging for the render engine.
//!
//! The engine reports its own diagnostics through `tracing` under the
//! `armature_router_engine` target. Request-scoped entries (such as render
//! timings) go through [`SsrRequest::log`](crate::SsrRequest::log); the
//! default sink, [`TracingRequestLog`], turns them into `tracing` events too.
//!
//! # Examples
//!
//! ```no_run
//! use armature_router_engine::logging::*;
//!
//! LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Pretty)
//!     .init();
//! ```

use crate::request::RequestLog;
use serde_json::Value;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to string for EnvFilter
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Pick the level for a tagged request log entry.
    ///
    /// The first severity tag wins; entries without one are `Info`.
    pub fn from_tags(tags: &[&str]) -> Self {
        tags.iter()
            .find_map(|tag| match *tag {
                "error" => Some(LogLevel::Error),
                "warn" | "warning" => Some(LogLevel::Warn),
                "debug" => Some(LogLevel::Debug),
                "trace" => Some(LogLevel::Trace),
                "info" => Some(LogLevel::Info),
                _ => None,
            })
            .unwrap_or(LogLevel::Info)
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format (default) - structured, machine-readable
    Json,
    /// Pretty format - formatted for development
    Pretty,
    /// Compact format - minimal output
    Compact,
}

/// Subscriber configuration. Logs are written to STDERR.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Include target (module path)
    pub targets: bool,
    /// Enable ANSI colors (ignored for JSON)
    pub colors: bool,
    /// Custom environment filter (overrides level if set)
    pub env_filter: Option<String>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_targets(mut self, enable: bool) -> Self {
        self.targets = enable;
        self
    }

    pub fn with_colors(mut self, enable: bool) -> Self {
        self.colors = enable;
        self
    }

    /// Set custom environment filter, e.g. `"armature_router_engine=debug"`.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn build_filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.as_str())),
        }
    }

    /// Install the global subscriber.
    ///
    /// Returns `false` if a global subscriber was already installed.
    pub fn init(self) -> bool {
        let filter = self.build_filter();
        let registry = tracing_subscriber::registry().with(filter);

        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(self.targets),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr)
                        .with_target(self.targets)
                        .with_ansi(self.colors),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr)
                        .with_target(self.targets)
                        .with_ansi(self.colors),
                )
                .try_init(),
        };

        installed.is_ok()
    }
}

impl Default for LogConfig {
    /// JSON format at INFO level
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            targets: true,
            colors: false,
            env_filter: None,
        }
    }
}

/// Default [`RequestLog`] sink: one `tracing` event per entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRequestLog;

impl RequestLog for TracingRequestLog {
    fn log(&self, tags: &[&str], payload: &Value) {
        let level = LogLevel::from_tags(tags);
        let tags = tags.join(",");
        match level {
            LogLevel::Error => tracing::error!(target: "armature_router_engine::request", tags = %tags, payload = %payload),
            LogLevel::Warn => tracing::warn!(target: "armature_router_engine::request", tags = %tags, payload = %payload),
            LogLevel::Debug => tracing::debug!(target: "armature_router_engine::request", tags = %tags, payload = %payload),
            LogLevel::Trace => tracing::trace!(target: "armature_router_engine::request", tags = %tags, payload = %payload),
            LogLevel::Info => tracing::info!(target: "armature_router_engine::request", tags = %tags, payload = %payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_as_str() {
        assert_eq!(LogLevel::Trace.as_str(), "trace");
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_level_from_tags() {
        assert_eq!(
            LogLevel::from_tags(&["info", "logmon", "splunk", "perf"]),
            LogLevel::Info
        );
        assert_eq!(LogLevel::from_tags(&["render", "error"]), LogLevel::Error);
        assert_eq!(LogLevel::from_tags(&["warning"]), LogLevel::Warn);
        assert_eq!(LogLevel::from_tags(&[]), LogLevel::Info);
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.targets);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = LogConfig::new()
            .level(LogLevel::Debug)
            .format(LogFormat::Pretty)
            .with_colors(true)
            .with_targets(false)
            .with_env_filter("armature_router_engine=trace");

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.colors);
        assert!(!config.targets);
        assert_eq!(
            config.env_filter.as_deref(),
            Some("armature_router_engine=trace")
        );
    }

    #[test]
    fn test_tracing_request_log_without_subscriber() {
        TracingRequestLog.log(&["info", "perf"], &serde_json::json!({"url": "/"}));
    }
}
