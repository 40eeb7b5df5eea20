//! Settlement error types.

use folio_shared::AppError;
use thiserror::Error;

/// Errors that can occur during settlement operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettlementError {
    // ========== Not Found ==========
    /// Booking not found.
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    // ========== Invalid State ==========
    /// Booking is already fully collected.
    #[error("Booking {0} is already collected")]
    AlreadyCollected(String),

    /// Guest has already checked in.
    #[error("Booking {0} is already checked in")]
    AlreadyCheckedIn(String),

    /// Guest has already checked out.
    #[error("Booking {0} is already checked out")]
    AlreadyCheckedOut(String),

    /// Booking is in a terminal state and accepts no further
    /// settlement operations.
    #[error("Booking {reference} is {status}")]
    Terminal {
        /// Booking reference.
        reference: String,
        /// The terminal status it is in.
        status: String,
    },

    /// Refunds require a cancelled booking.
    #[error("Booking {0} must be cancelled before refunding")]
    RefundRequiresCancelled(String),

    // ========== Validation ==========
    /// Amount must be positive.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(rust_decimal::Decimal),

    /// Departure cannot precede arrival.
    #[error("Check-out {check_out} is before check-in {check_in}")]
    InvalidStayDates {
        /// Scheduled arrival.
        check_in: chrono::NaiveDate,
        /// Scheduled departure.
        check_out: chrono::NaiveDate,
    },
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match &err {
            SettlementError::BookingNotFound(_) => Self::NotFound(err.to_string()),
            SettlementError::AlreadyCollected(_)
            | SettlementError::AlreadyCheckedIn(_)
            | SettlementError::AlreadyCheckedOut(_)
            | SettlementError::Terminal { .. }
            | SettlementError::RefundRequiresCancelled(_) => Self::InvalidState(err.to_string()),
            SettlementError::NonPositiveAmount(_) | SettlementError::InvalidStayDates { .. } => {
                Self::Validation(err.to_string())
            }
        }
    }
}
