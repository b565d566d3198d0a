//! Business logic services.

pub mod posts;

pub use posts::PostService;
