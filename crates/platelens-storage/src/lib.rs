//! Platelens storage library
//!
//! Storage abstraction for uploaded images plus the local filesystem backend.
//!
//! # Stored filename format
//!
//! Uploaded files are stored flat under the upload directory as
//! `{sanitized-base}-{unix_millis}-{base36_token}.{ext}`. The sanitized base keeps
//! the name human-traceable; the timestamp plus random token makes concurrent
//! uploads collision-free by construction. Generation is centralized in the
//! `filename` module.

pub mod filename;
pub mod local;
pub mod traits;

pub use filename::generate_stored_filename;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult, StoredImage};
