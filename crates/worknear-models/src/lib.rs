//! Shared data models for the WorkNear backend.
//!
//! This crate provides:
//! - Worker and Post documents as stored in MongoDB
//! - GeoJSON point type for worker locations
//! - Category normalization

pub mod geo;
pub mod post;
pub mod worker;

pub use geo::{GeoPoint, InvalidCoordinates};
pub use post::Post;
pub use worker::{normalize_category, Worker};
