//! KittenBoot logging setup
//!
//! The KittenBoot crates only emit [`tracing`] events. This crate installs a
//! subscriber for them, configured from the environment.
//!
//! ```rust
//! kittenboot_log::init();
//! tracing::info!(target: "kittenboot::demo", "ready");
//! ```
//!
//! # Environment Variables
//!
//! - `KITTENBOOT_DEBUG=1` - Default to debug level
//! - `KITTENBOOT_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `KITTENBOOT_LOG_FORMAT=pretty|compact|json` - Set output format
//! - `KITTENBOOT_LOG_COLOR=1|0` - Enable/disable ANSI colors
//! - `RUST_LOG` - Full filter directives, overrides the level

use once_cell::sync::Lazy;
use std::fmt;
use std::io::IsTerminal;
use std::str::FromStr;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

/// Prefix shared by every environment variable read here.
pub const ENV_PREFIX: &str = "KITTENBOOT";

// ============================================================================
// Levels and formats
// ============================================================================

/// Minimum level passed to the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Most verbose
    Trace,
    /// Debug
    Debug,
    /// Info
    Info,
    /// Warn
    Warn,
    /// Error
    Error,
    /// Nothing is logged
    Off,
}

impl Level {
    /// Filter directive for this level.
    pub fn directive(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl FromStr for Level {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "off" | "none" => Ok(Level::Off),
            _ => Err(ParseError::new("level", s)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive())
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line, human oriented
    Pretty,
    /// Single line per event
    Compact,
    /// One JSON object per event
    Json,
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Format::Pretty),
            "compact" => Ok(Format::Compact),
            "json" => Ok(Format::Json),
            _ => Err(ParseError::new("format", s)),
        }
    }
}

/// Unrecognized level or format name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: &'static str,
    value: String,
}

impl ParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseError {}

// ============================================================================
// Configuration
// ============================================================================

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether `KITTENBOOT_DEBUG` was set
    pub debug: bool,
    /// Minimum level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// ANSI colors in pretty and compact output
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Compact,
            color: false,
        }
    }
}

impl LogConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        let color_default = std::io::stderr().is_terminal();
        Self::from_lookup(|key| std::env::var(key).ok(), color_default)
    }

    /// Build the configuration from any key lookup.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F, color_default: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}_{}", ENV_PREFIX, name));

        let debug = var("DEBUG").is_some_and(|v| is_truthy(&v));
        let level = var("LOG_LEVEL")
            .and_then(|v| v.parse().ok())
            .unwrap_or(if debug { Level::Debug } else { Level::Info });
        let format = var("LOG_FORMAT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(Format::Compact);
        let color = var("LOG_COLOR")
            .map(|v| is_truthy(&v))
            .unwrap_or(color_default);

        Self {
            debug,
            level,
            format,
            color,
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.directive()))
    }
}

/// Truthiness rule for boolean `KITTENBOOT_*` variables.
///
/// `1`, `true`, `yes` and `on`, case-insensitive and trimmed.
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Configuration read from the environment on first use.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

// ============================================================================
// Subscriber installation
// ============================================================================

/// Install the global subscriber using [`config`].
///
/// Returns `false` if a global subscriber was already set, in which case
/// nothing changes.
pub fn init() -> bool {
    init_with(config())
}

/// Install the global subscriber using `config`.
pub fn init_with(config: &LogConfig) -> bool {
    let registry = tracing_subscriber::registry().with(config.filter());
    let layer = tfmt::layer().with_writer(std::io::stderr);

    let result = match config.format {
        Format::Pretty => registry.with(layer.pretty().with_ansi(config.color)).try_init(),
        Format::Compact => registry.with(layer.compact().with_ansi(config.color)).try_init(),
        #[cfg(feature = "json")]
        Format::Json => registry.with(layer.json()).try_init(),
        #[cfg(not(feature = "json"))]
        Format::Json => registry.with(layer.compact().with_ansi(false)).try_init(),
    };

    result.is_ok()
}
