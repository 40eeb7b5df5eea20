//! Booking settlement state machine.
//!
//! Owns a booking's monetary lifecycle and is the primary producer of
//! daybook entries. Status is always a pure function of the amount
//! fields; the terminal states (cancelled, deleted, rescheduled) are the
//! only exogenous overrides.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::SettlementError;
pub use service::SettlementService;
pub use types::{
    AddOn, AdvancePayment, Booking, BookingStatus, CheckoutInput, CheckoutOutcome,
    CollectPaymentInput, CreateBookingInput, LedgerTransfer, PassThroughContext,
    PassThroughPayment, PaymentType, RefundInput,
};
