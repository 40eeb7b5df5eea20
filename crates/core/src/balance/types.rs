//! Carry-forward types: checkpoints and day positions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An explicit, admin-entered snapshot of the cash/bank position at the
/// opening of a date.
///
/// Checkpoints are replay anchors, not cached results: the carry-forward
/// engine never replays further back than the most recent checkpoint.
/// At most one exists per date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheckpoint {
    /// The day this checkpoint opens.
    pub date: NaiveDate,
    /// Opening cash position.
    pub cash: Decimal,
    /// Opening bank position (every non-cash channel).
    pub bank: Decimal,
}

/// The computed cash/bank position for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPosition {
    /// The day.
    pub date: NaiveDate,
    /// Opening cash.
    pub cash_opening: Decimal,
    /// Opening bank.
    pub bank_opening: Decimal,
    /// Cash income during the day.
    pub cash_income: Decimal,
    /// Bank income during the day.
    pub bank_income: Decimal,
    /// Cash expense during the day.
    pub cash_expense: Decimal,
    /// Bank expense during the day.
    pub bank_expense: Decimal,
    /// Closing cash: opening + income - expense.
    pub cash_closing: Decimal,
    /// Closing bank: opening + income - expense.
    pub bank_closing: Decimal,
}
