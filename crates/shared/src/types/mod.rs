//! Common types used across the application.

pub mod id;
pub mod money;
pub mod month;

pub use id::*;
pub use money::{non_negative, round_currency};
pub use month::Month;
