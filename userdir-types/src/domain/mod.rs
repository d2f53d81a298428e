//! Domain models for the user directory service.

pub mod money;
pub mod user;

pub use money::Money;
pub use user::{User, UserId};
