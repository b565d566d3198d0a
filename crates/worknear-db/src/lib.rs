//! MongoDB access layer for the WorkNear backend.
//!
//! This crate provides:
//! - Connection wrapper with index bootstrap (unique phone, 2dsphere location)
//! - Typed repositories for Workers and Posts
//! - Session-scoped mutations for the dual-write Post/Worker relationship

pub mod client;
pub mod error;
pub mod posts;
pub mod workers;

pub use client::MongoDb;
pub use error::{DbError, DbResult};
pub use posts::PostRepository;
pub use workers::WorkerRepository;
