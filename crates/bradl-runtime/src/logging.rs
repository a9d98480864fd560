//! Logging setup.
//!
//! Everything in BradlBot logs through `tracing`. Lifecycle and command lines
//! use the `BradlBot` target, so a line's source is its target while the
//! subscriber supplies severity and timestamp.
//!
//! ```rust,ignore
//! use bradl_runtime::logging;
//!
//! let config = bradl_runtime::config::load_config()?;
//! let _guard = logging::init_from_config(&config.logging);
//! ```
//!
//! ```rust,ignore
//! use bradl_runtime::logging::{LoggingBuilder, SpanEvents};
//!
//! let _guard = LoggingBuilder::new()
//!     .directive("bradl_framework=debug")
//!     .span_events(SpanEvents::LIFECYCLE)
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig, SpanEventConfig};

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanEvents {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

impl SpanEvents {
    pub const NONE: Self = Self {
        new: false,
        enter: false,
        exit: false,
        close: false,
    };

    /// Creation and close only; shows how long each dispatch span lived.
    pub const LIFECYCLE: Self = Self {
        new: true,
        enter: false,
        exit: false,
        close: true,
    };

    pub const FULL: Self = Self {
        new: true,
        enter: true,
        exit: true,
        close: true,
    };

    fn to_fmt_span(self) -> FmtSpan {
        [
            (self.new, FmtSpan::NEW),
            (self.enter, FmtSpan::ENTER),
            (self.exit, FmtSpan::EXIT),
            (self.close, FmtSpan::CLOSE),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .fold(FmtSpan::NONE, |acc, (_, flag)| acc | flag)
    }
}

impl From<&SpanEventConfig> for SpanEvents {
    fn from(config: &SpanEventConfig) -> Self {
        Self {
            new: config.new,
            enter: config.enter,
            exit: config.exit,
            close: config.close,
        }
    }
}

/// Keeps the file writer alive; dropping it flushes pending lines.
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

/// Initializes logging from the `logging` table.
///
/// Logging can only be initialized once per process; later calls are no-ops.
pub fn init_from_config(config: &LoggingConfig) -> LoggingGuard {
    LoggingBuilder::from_config(config).init()
}

/// A builder for the global subscriber.
#[derive(Debug)]
pub struct LoggingBuilder {
    level: tracing::Level,
    directives: Vec<String>,
    span_events: SpanEvents,
    format: LogFormat,
    output: LogOutput,
    file_path: Option<PathBuf>,
    with_target: bool,
    with_thread_ids: bool,
    with_file: bool,
    with_line_number: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: Vec::new(),
            span_events: SpanEvents::NONE,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            file_path: None,
            with_target: true,
            with_thread_ids: false,
            with_file: false,
            with_line_number: false,
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut builder = Self::new()
            .with_level(config.level.to_tracing_level())
            .format(config.format)
            .output(config.output)
            .span_events(SpanEvents::from(&config.span_events))
            .with_thread_ids(config.thread_ids)
            .with_file(config.file_location)
            .with_line_number(config.file_location);
        builder.file_path.clone_from(&config.file_path);

        let mut filters: Vec<_> = config.filters.iter().collect();
        filters.sort_by_key(|(target, _)| *target);
        for (target, level) in filters {
            builder = builder.directive(&format!("{target}={level}"));
        }
        builder
    }

    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    /// Adds a filter directive such as `bradl_framework=debug`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    pub fn span_events(mut self, events: SpanEvents) -> Self {
        self.span_events = events;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    pub fn with_line_number(mut self, enabled: bool) -> Self {
        self.with_line_number = enabled;
        self
    }

    /// `RUST_LOG` if set, else the configured level; directives apply on top.
    fn build_filter(&self) -> EnvFilter {
        let base = self.level.to_string().to_lowercase();
        let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base));
        for directive in &self.directives {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(e) => eprintln!("Ignoring invalid log directive '{directive}': {e}"),
            }
        }
        filter
    }

    /// Installs the subscriber, ignoring an already installed one.
    pub fn init(self) -> LoggingGuard {
        self.try_init().unwrap_or_default()
    }

    pub fn try_init(self) -> Result<LoggingGuard, TryInitError> {
        let filter = self.build_filter();
        let span_events = self.span_events.to_fmt_span();

        macro_rules! configure_layer {
            ($layer:expr) => {
                $layer
                    .with_span_events(span_events.clone())
                    .with_target(self.with_target)
                    .with_thread_ids(self.with_thread_ids)
                    .with_file(self.with_file)
                    .with_line_number(self.with_line_number)
            };
        }

        macro_rules! init_with_writer {
            ($writer:expr, $ansi:expr) => {
                match self.format {
                    #[cfg(feature = "json-log")]
                    LogFormat::Json => tracing_subscriber::registry()
                        .with(fmt::layer().json().with_span_events(span_events).with_writer($writer))
                        .with(filter)
                        .try_init(),
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(configure_layer!(fmt::layer().compact().with_ansi($ansi).with_writer($writer)))
                        .with(filter)
                        .try_init(),
                    LogFormat::Full => tracing_subscriber::registry()
                        .with(configure_layer!(fmt::layer().with_ansi($ansi).with_writer($writer)))
                        .with(filter)
                        .try_init(),
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(configure_layer!(fmt::layer().pretty().with_ansi($ansi).with_writer($writer)))
                        .with(filter)
                        .try_init(),
                }
            };
        }

        match (self.output, self.file_path.as_deref()) {
            (LogOutput::Stdout, _) => init_with_writer!(std::io::stdout, true).map(|()| LoggingGuard::default()),
            (LogOutput::Stderr, _) => init_with_writer!(std::io::stderr, true).map(|()| LoggingGuard::default()),
            (LogOutput::File, Some(path)) => {
                let appender = tracing_appender::rolling::never(
                    path.parent()
                        .filter(|p| !p.as_os_str().is_empty())
                        .unwrap_or_else(|| Path::new(".")),
                    path.file_name().unwrap_or_else(|| OsStr::new("bradlbot.log")),
                );
                let (writer, guard) = tracing_appender::non_blocking(appender);
                init_with_writer!(writer, false).map(|()| LoggingGuard {
                    _worker: Some(guard),
                })
            }
            (LogOutput::File, None) => {
                eprintln!("File log output requested without logging.file_path, using stdout");
                init_with_writer!(std::io::stdout, true).map(|()| LoggingGuard::default())
            }
        }
    }
}
