//! Currency rounding helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts in the system are `rust_decimal::Decimal`, rounded to
//! 2 decimal places at write time.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every persisted amount carries.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds an amount to the persisted currency scale.
///
/// Uses midpoint-away-from-zero, the rounding guests see on printed bills.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the amount clamped to zero from below.
///
/// Used where a computed remainder (pending balance, hotel share) must
/// never go negative on an overpaid booking.
#[must_use]
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}
