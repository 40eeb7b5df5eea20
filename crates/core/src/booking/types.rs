//! Booking domain types.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::{BookingId, PassThroughId};

use crate::daybook::Channel;

/// Settlement status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    /// Nothing received yet.
    Pending,
    /// Some money received, some still due.
    Partial,
    /// Fully settled.
    Collected,
    /// Cancelled by guest or staff.
    Cancelled,
    /// Soft-deleted; the record stays for the audit trail.
    Deleted,
    /// Superseded by a rescheduled booking.
    Rescheduled,
}

impl BookingStatus {
    /// Derives the status from the amount fields.
    ///
    /// This is the single source of truth: re-evaluated after every
    /// monetary mutation, never incrementally patched.
    #[must_use]
    pub fn derive(total: Decimal, advance: Decimal, balance: Decimal) -> Self {
        let received = advance + balance;
        let pending = total - received;
        if pending <= Decimal::ZERO {
            Self::Collected
        } else if received > Decimal::ZERO {
            Self::Partial
        } else {
            Self::Pending
        }
    }

    /// Returns true for the exogenous terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Deleted | Self::Rescheduled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Collected => write!(f, "COLLECTED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Deleted => write!(f, "DELETED"),
            Self::Rescheduled => write!(f, "RESCHEDULED"),
        }
    }
}

/// How the guest pays for the stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    /// Paid in full before arrival.
    Prepaid,
    /// Billed after the stay.
    Postpaid,
    /// Settles at the front desk on arrival.
    PayAtCheckIn,
    /// Outstanding balance moves to the booking agent's ledger.
    Ledger,
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prepaid => write!(f, "Prepaid"),
            Self::Postpaid => write!(f, "Postpaid"),
            Self::PayAtCheckIn => write!(f, "Pay at Check-in"),
            Self::Ledger => write!(f, "Ledger"),
        }
    }
}

/// A guest stay and its monetary lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier.
    pub id: BookingId,
    /// Sequential human-readable reference, e.g. "BK-0042".
    pub reference: String,
    /// Guest display name.
    pub guest_name: String,
    /// Booking agent, if the stay was agent-sourced.
    pub agent_name: Option<String>,
    /// Actual room rent for the stay, before KOT and add-ons.
    pub room_rent: Decimal,
    /// Scheduled arrival day.
    pub check_in: NaiveDate,
    /// Scheduled departure day.
    pub check_out: NaiveDate,
    /// Total billed amount; grows at checkout with KOT and add-ons.
    pub total_amount: Decimal,
    /// Advance received at or after creation.
    pub advance_received: Decimal,
    /// Day the advance arrived.
    pub advance_date: Option<NaiveDate>,
    /// Channel the advance arrived through.
    pub advance_mode: Option<Channel>,
    /// Balance received after the advance.
    pub balance_received: Decimal,
    /// Day the most recent balance payment arrived.
    pub balance_date: Option<NaiveDate>,
    /// Channel the most recent balance payment arrived through.
    pub balance_mode: Option<Channel>,
    /// Manually entered kitchen-order amount.
    pub kot_amount: Decimal,
    /// Accumulated add-on charges.
    pub add_on_amount: Decimal,
    /// How the guest pays.
    pub payment_type: PaymentType,
    /// Settlement status; always consistent with the amount fields
    /// except in the terminal states.
    pub status: BookingStatus,
    /// Whether the guest has checked in.
    pub checked_in: bool,
    /// When the guest checked in.
    pub checked_in_at: Option<NaiveDateTime>,
    /// Whether the guest has checked out.
    pub checked_out: bool,
    /// When the guest checked out.
    pub checked_out_at: Option<NaiveDateTime>,
    /// Free-text audit remarks, one line per action.
    pub remarks: String,
}

impl Booking {
    /// Total money received so far.
    #[must_use]
    pub fn received(&self) -> Decimal {
        self.advance_received + self.balance_received
    }

    /// Amount still due; negative when overpaid.
    #[must_use]
    pub fn pending(&self) -> Decimal {
        self.total_amount - self.received()
    }

    /// Status freshly derived from the amount fields.
    ///
    /// Decision-making code uses this, never the stored `status`.
    #[must_use]
    pub fn derived_status(&self) -> BookingStatus {
        BookingStatus::derive(self.total_amount, self.advance_received, self.balance_received)
    }

    /// Appends one dated audit line to the remarks.
    pub(crate) fn push_remark(&mut self, date: NaiveDate, actor: &str, text: &str) {
        if !self.remarks.is_empty() {
            self.remarks.push('\n');
        }
        self.remarks.push_str(&format!("{date} {actor}: {text}"));
    }
}

/// Why a pass-through payment was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassThroughContext {
    /// Recorded during payment collection.
    Collect,
    /// Recorded at checkout.
    Checkout,
    /// Recorded for a kitchen-order settlement.
    Kot,
}

/// The hotel's earned share when the office account collects the full
/// guest payment on the hotel's behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassThroughPayment {
    /// Unique identifier.
    pub id: PassThroughId,
    /// The booking this share belongs to.
    pub booking_id: BookingId,
    /// Booking reference, for reporting joins.
    pub reference: String,
    /// The hotel's share only, never the office's full collection.
    pub amount: Decimal,
    /// Source tag, e.g. "Advance" or "Checkout".
    pub sub_category: String,
    /// Day the share was earned.
    pub date: NaiveDate,
    /// Where in the lifecycle it was recorded.
    pub context: PassThroughContext,
}

/// An advance collected at booking creation.
#[derive(Debug, Clone)]
pub struct AdvancePayment {
    /// Amount collected.
    pub amount: Decimal,
    /// Day it was collected.
    pub date: NaiveDate,
    /// Channel it was collected through.
    pub mode: Channel,
}

/// Input for creating a booking.
#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    /// Guest display name.
    pub guest_name: String,
    /// Booking agent, if agent-sourced.
    pub agent_name: Option<String>,
    /// Room rent for the stay.
    pub room_rent: Decimal,
    /// Scheduled arrival day.
    pub check_in: NaiveDate,
    /// Scheduled departure day.
    pub check_out: NaiveDate,
    /// How the guest pays.
    pub payment_type: PaymentType,
    /// Advance collected up front, if any.
    pub advance: Option<AdvancePayment>,
}

/// Input for collecting a balance payment.
#[derive(Debug, Clone)]
pub struct CollectPaymentInput {
    /// Amount to collect; ignored for the pass-through channel, which
    /// always collects the full outstanding total.
    pub amount: Decimal,
    /// Channel the money arrives through.
    pub mode: Channel,
    /// Day the money arrives.
    pub date: NaiveDate,
}

/// An add-on charge billed at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOn {
    /// What was provided, e.g. "Heater".
    pub name: String,
    /// Charge amount.
    pub amount: Decimal,
}

/// An explicit transfer of part of the checkout balance to the booking
/// agent's ledger.
#[derive(Debug, Clone)]
pub struct LedgerTransfer {
    /// The portion collected now; clamped to the outstanding balance.
    /// The remainder becomes agent-ledger debt.
    pub collect_amount: Decimal,
}

/// Input for checking a guest out.
#[derive(Debug, Clone)]
pub struct CheckoutInput {
    /// Business day of the checkout.
    pub date: NaiveDate,
    /// Manually entered kitchen-order total.
    pub kot_amount: Decimal,
    /// Add-on charges to bill.
    pub add_ons: Vec<AddOn>,
    /// Channel the settlement runs through.
    pub mode: Channel,
    /// Present when part of the balance moves to the agent's ledger.
    pub ledger_transfer: Option<LedgerTransfer>,
}

/// What a checkout did, for the caller's receipt.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    /// Final settlement status.
    pub status: BookingStatus,
    /// Total billed after KOT and add-ons.
    pub total_amount: Decimal,
    /// Balance collected directly during this checkout.
    pub collected: Decimal,
    /// Kitchen orders settled by the kitchen collaborator.
    pub kitchen_settled: Decimal,
    /// Hotel share routed through the office account, if any.
    pub pass_through_share: Option<Decimal>,
}

/// Input for refunding a cancelled booking.
#[derive(Debug, Clone)]
pub struct RefundInput {
    /// Amount to refund.
    pub amount: Decimal,
    /// Day of the refund.
    pub date: NaiveDate,
    /// Channel the refund goes out through.
    pub mode: Channel,
    /// Also delete every income entry the booking emitted.
    pub delete_original_entries: bool,
}
