//! # pvm-common
//!
//! Shared configuration, error types, version ordering and input filters
//! for the plugin version manager.

pub mod config;
pub mod error;
pub mod plugin;
pub mod sanitize;
pub mod version;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use version::VersionRecord;
