//! Platelens core library
//!
//! Shared configuration and error types used by the storage, vision, and API crates.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{AppError, LogLevel};
