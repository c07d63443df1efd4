//! Shared configuration and errors for Spendcast.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, ForecastConfig, LoggingConfig};
pub use error::{AppError, AppResult};
