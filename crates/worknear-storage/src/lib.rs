//! Local filesystem media store.
//!
//! This crate provides:
//! - Image upload persistence under a configurable directory
//! - Stored-key generation (`uploads/<uuid>.<ext>`)
//! - Best-effort deletion with key validation

pub mod error;
pub mod media;

pub use error::{StorageError, StorageResult};
pub use media::MediaStore;
