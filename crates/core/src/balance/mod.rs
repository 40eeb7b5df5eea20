//! Cash/bank balance carry-forward engine.
//!
//! Computes any day's opening and closing position by replaying daybook
//! entries forward from the most recent checkpoint. Checkpoints are
//! replay anchors, not cached results: correcting a historical entry
//! corrects every later computed balance automatically, as long as no
//! checkpoint was taken after the correction point.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::BalanceService;
pub use types::{BalanceCheckpoint, DayPosition};
