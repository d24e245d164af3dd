//! HTTP handlers for the LexGuard service.

pub mod compliance;
pub mod health;

pub use compliance::{check_content, generate_content};
pub use health::{health_check, welcome};
