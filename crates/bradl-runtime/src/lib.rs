//! BradlBot Runtime - configuration, logging and event intake.
//!
//! This crate provides:
//! - The `config.json` record, its figment-based loader and the first-run prompt
//! - Logging configuration (`LoggingBuilder`)
//! - The event-intake loop (`BotRuntime`)
//!
//! ```ignore
//! use bradl_runtime::{BotRuntime, logging};
//! use bradl_runtime::config::{ConfigLoader, ensure_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ensure_config("config.json".as_ref(), std::io::stdin().lock(), std::io::stdout())?;
//!     let config = ConfigLoader::new().file("config.json").load()?;
//!     let _guard = logging::init_from_config(&config.logging);
//!
//!     BotRuntime::builder()
//!         .config(config)
//!         .groups(bradl_commands::groups())
//!         .transport(transport)
//!         .build()?
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{BotConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, LoggingGuard, SpanEvents};
pub use runtime::{BotRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for handler authors.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
