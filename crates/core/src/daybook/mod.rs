//! Append-only dated income/expense ledger.
//!
//! The daybook is the atomic unit of financial truth: every rupee that
//! moves through a direct channel lands here as one dated entry. The
//! settlement state machine writes it, the carry-forward engine replays
//! it.

pub mod ledger;
pub mod types;

pub use ledger::Daybook;
pub use types::{Channel, EntryFilter, EntryInput, EntryKind, LedgerEntry};
