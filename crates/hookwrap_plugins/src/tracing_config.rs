//! Subscriber setup for applications using wrapped functions.
//!
//! [`TracingHooks`](crate::TracingHooks) only emits events; something still has
//! to install a `tracing` subscriber to print them. [`TracingConfig`] does that
//! with `tracing_subscriber`, choosing the level, output format and optional
//! per-target filter.
//!
//! # Example
//!
//! ```
//! use hookwrap_plugins::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! // Development: pretty output at debug level, including span events.
//! let dev = TracingConfig::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Pretty)
//!     .with_span_events(true);
//!
//! // Production: JSON output for log aggregation.
//! let prod = TracingConfig::new()
//!     .with_level(Level::INFO)
//!     .with_format(TracingFormat::Json)
//!     .with_env_filter("hookwrap_core=warn,my_service=info");
//!
//! assert_eq!(dev.level(), Level::DEBUG);
//! assert_eq!(prod.format(), TracingFormat::Json);
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingInitError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TracingInitError {
    /// The env filter string could not be parsed.
    #[error("invalid env filter '{filter}': {source}")]
    InvalidFilter {
        /// The filter string that failed to parse.
        filter: String,
        /// The parse error.
        source: ParseError,
    },

    /// A global subscriber was already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Global `tracing` subscriber configuration.
///
/// # Environment Filter
///
/// Use [`with_env_filter`](Self::with_env_filter) to set target-specific log
/// levels. Without one, every target is filtered at [`level`](Self::level).
///
/// ```
/// use hookwrap_plugins::TracingConfig;
///
/// TracingConfig::new()
///     .with_env_filter("hookwrap_core=debug,hookwrap_plugins=info")
/// # ;
/// ```
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Maximum log level.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Environment filter (e.g., "`hookwrap_core=debug`").
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates a new `TracingConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// The configured maximum log level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// The configured output format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// The configured env filter, if any.
    #[must_use]
    pub fn env_filter(&self) -> Option<&str> {
        self.env_filter.as_deref()
    }

    /// Returns `true` if span enter/exit events are printed.
    #[must_use]
    pub fn span_events(&self) -> bool {
        self.span_events
    }

    /// Builds the filter this configuration installs.
    ///
    /// # Errors
    ///
    /// Returns [`TracingInitError::InvalidFilter`] if the env filter string
    /// does not parse.
    pub fn build_filter(&self) -> Result<EnvFilter, TracingInitError> {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).map_err(|source| TracingInitError::InvalidFilter {
                    filter: filter.clone(),
                    source,
                })
            }
            None => Ok(EnvFilter::new(self.level.as_str())),
        }
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if the env filter is invalid or a global subscriber
    /// is already installed.
    pub fn try_init(&self) -> Result<(), TracingInitError> {
        self.install(self.build_filter()?)
    }

    /// Installs the global subscriber, ignoring failures.
    ///
    /// An invalid env filter falls back to [`level`](Self::level); an already
    /// installed subscriber is left in place.
    pub fn init(&self) {
        let filter = self
            .build_filter()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()));
        self.install(filter).ok();
    }

    fn install(&self, env_filter: EnvFilter) -> Result<(), TracingInitError> {
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        match self.format {
            TracingFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init()?,
            TracingFormat::Compact => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init()?,
            TracingFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init()?,
        }

        tracing::info!(
            level = %self.level,
            format = ?self.format,
            "tracing subscriber initialized"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_format_default_is_pretty() {
        assert_eq!(TracingFormat::default(), TracingFormat::Pretty);
    }

    #[test]
    fn default_level_is_info() {
        let config = TracingConfig::default();
        assert_eq!(config.level(), Level::INFO);
        assert!(config.env_filter().is_none());
        assert!(!config.span_events());
    }

    #[test]
    fn builder_sets_fields() {
        let config = TracingConfig::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Compact)
            .with_env_filter("hookwrap_core=debug")
            .with_span_events(true);

        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format(), TracingFormat::Compact);
        assert_eq!(config.env_filter(), Some("hookwrap_core=debug"));
        assert!(config.span_events());
    }

    #[test]
    fn filter_defaults_to_level() {
        let filter = TracingConfig::new()
            .with_level(Level::WARN)
            .build_filter()
            .unwrap();
        assert!(filter.to_string().contains("warn"));
    }

    #[test]
    fn invalid_filter_is_reported() {
        let err = TracingConfig::new()
            .with_env_filter("hookwrap_core=notalevel")
            .build_filter()
            .unwrap_err();

        match err {
            TracingInitError::InvalidFilter { filter, .. } => {
                assert_eq!(filter, "hookwrap_core=notalevel");
            }
            other => panic!("expected InvalidFilter, got {other:?}"),
        }
    }

    #[test]
    fn invalid_filter_fails_try_init() {
        let result = TracingConfig::new()
            .with_env_filter("hookwrap_core=loud")
            .try_init();
        assert!(matches!(result, Err(TracingInitError::InvalidFilter { .. })));
    }
}
