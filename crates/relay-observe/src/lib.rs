//! Logging setup shared by relay binaries.
//!
//! Call [`init_logger`] once at startup; afterwards every `tracing` macro in the
//! workspace goes through the configured subscriber.
mod config;
pub use config::LoggerConfig;

mod error;
pub use error::{LoggerError, LoggerResult};

mod init;
pub use init::init_logger;

mod object;
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone, LoggerTimer};
