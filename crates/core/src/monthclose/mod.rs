//! Month-end close engine.
//!
//! Computes the cash/bank closing balance for a month and a ledger
//! closing balance for every agent (plus the pass-through office
//! entity), then propagates them as the next month's openings.

pub mod error;
pub mod service;
pub mod types;


pub use error::MonthCloseError;
pub use service::MonthCloseService;
pub use types::{AgentClosing, MonthClose};
