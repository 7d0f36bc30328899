//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - Console output for development
//! - Local file logging with rotation (JSON-formatted)
//!
//! # Example
//!
//! ```no_run
//! use coursepack::logging::init_logging;
//! use coursepack::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging(&config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Engine initialized");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
