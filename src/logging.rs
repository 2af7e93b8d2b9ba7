//! Subscriber setup for container diagnostics
//!
//! The container emits `tracing` events under the [`TARGET`] target:
//! registrations and instantiations at `DEBUG`, cache hits and strategy
//! decisions at `TRACE`. This module installs a `tracing-subscriber` pipeline
//! to print them.
//!
//! # Features
//!
//! - `logging` - Emit events (default)
//! - `logging-json` - One JSON object per event
//! - `logging-pretty` - Multi-line human-readable output
//!
//! Without either subscriber feature, [`LoggingBuilder::init`] is a no-op and
//! events reach whatever subscriber the application installs itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use wirebox::logging;
//!
//! // Picks JSON when logging-json is enabled
//! logging::init();
//!
//! // Container events only, with source locations
//! logging::builder()
//!     .with_level(tracing::Level::TRACE)
//!     .wirebox_only()
//!     .with_source_location()
//!     .compact()
//!     .init()
//!     .expect("subscriber already installed");
//! ```

use tracing::Level;

/// Target every container event is emitted under
pub const TARGET: &str = "wirebox";

/// Output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Multi-line, colored
    Pretty,
    /// One terse line per event
    Compact,
}

/// Configures and installs a global subscriber.
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
    respect_env: bool,
    source_location: bool,
    thread_info: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::default(),
            target: None,
            respect_env: true,
            source_location: false,
            thread_info: false,
        }
    }
}

impl LoggingBuilder {
    /// `DEBUG` and above, JSON layout, every target
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest level that is printed
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Print only events whose target is `target`
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Print only container events
    pub fn wirebox_only(self) -> Self {
        self.with_target_filter(TARGET)
    }

    /// Use the configured level even if `RUST_LOG` is set
    pub fn ignore_env(mut self) -> Self {
        self.respect_env = false;
        self
    }

    /// Annotate events with file and line
    pub fn with_source_location(mut self) -> Self {
        self.source_location = true;
        self
    }

    /// Annotate events with thread id and name
    pub fn with_thread_info(mut self) -> Self {
        self.thread_info = true;
        self
    }

    /// Set the output layout
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Shorthand for `format(LogFormat::Json)`
    pub fn json(self) -> Self {
        self.format(LogFormat::Json)
    }

    /// Shorthand for `format(LogFormat::Pretty)`
    pub fn pretty(self) -> Self {
        self.format(LogFormat::Pretty)
    }

    /// Shorthand for `format(LogFormat::Compact)`
    pub fn compact(self) -> Self {
        self.format(LogFormat::Compact)
    }

    /// The `EnvFilter` directive used when `RUST_LOG` does not apply
    pub fn directive(&self) -> String {
        match self.target {
            Some(target) => format!("{target}={}", self.level),
            None => self.level.to_string(),
        }
    }

    /// Install the subscriber globally.
    ///
    /// Fails if a global subscriber is already set. Without `logging-json`
    /// the JSON layout falls back to the default text layout.
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn init(self) -> Result<(), tracing_subscriber::util::TryInitError> {
        use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

        let from_env = self.respect_env && std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
        let filter = if from_env {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
        } else {
            EnvFilter::new(self.directive())
        };

        let (source, thread) = (self.source_location, self.thread_info);
        macro_rules! annotated {
            ($layer:expr) => {
                $layer
                    .with_file(source)
                    .with_line_number(source)
                    .with_thread_ids(thread)
                    .with_thread_names(thread)
                    .boxed()
            };
        }

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match self.format {
            #[cfg(feature = "logging-json")]
            LogFormat::Json => annotated!(fmt::layer().json()),
            #[cfg(not(feature = "logging-json"))]
            LogFormat::Json => annotated!(fmt::layer()),
            LogFormat::Pretty => annotated!(fmt::layer().pretty()),
            LogFormat::Compact => annotated!(fmt::layer().compact()),
        };

        tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init()
    }

    /// No subscriber backend compiled in
    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn init(self) -> Result<(), std::convert::Infallible> {
        Ok(())
    }
}

/// Start configuring a subscriber
pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Install the default subscriber unless one is already set.
///
/// JSON when `logging-json` is enabled, pretty otherwise.
pub fn init() {
    if cfg!(feature = "logging-json") {
        init_json();
    } else {
        init_pretty();
    }
}

/// Install a JSON subscriber unless one is already set
///
/// ```json
/// {"timestamp":"2026-01-01T00:00:00.000Z","level":"DEBUG","target":"wirebox","fields":{"message":"Registering injectable","injectable":"database"}}
/// ```
pub fn init_json() {
    let _ = builder().json().init();
}

/// Install a pretty subscriber unless one is already set
pub fn init_pretty() {
    let _ = builder().pretty().init();
}

/// Install a subscriber that only prints container events
pub fn init_wirebox_only() {
    let _ = builder().wirebox_only().init();
}
