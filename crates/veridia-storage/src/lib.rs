//! Blob storage abstraction for face photo uploads.
//!
//! Keys follow the convention `<prefix>/<session_id>/<pose>_<index>_<hex><ext>`;
//! the backends only see opaque keys and return public URLs.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use veridia_core::StorageBackend;
