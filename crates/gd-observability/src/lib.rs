//! # gd-observability
//!
//! Structured logging for Gabinete Digital, built on `tracing`.

pub mod logging;

pub use logging::{init_logging, init_logging_with_config, LogFormat, LoggingConfig, LoggingError};
