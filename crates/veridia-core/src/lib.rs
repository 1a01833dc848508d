//! Core types for the veridia identity/eKYC backend: configuration,
//! the unified error type, and domain models shared across crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
