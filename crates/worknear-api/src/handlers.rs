//! Request handlers.

pub mod auth;
pub mod health;
pub mod posts;
pub mod workers;

pub use auth::*;
pub use health::*;
pub use posts::*;
pub use workers::*;
