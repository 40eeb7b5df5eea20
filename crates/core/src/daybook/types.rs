//! Daybook entry types and settlement channels.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::EntryId;

/// Raw payment-mode strings with this prefix route through the office
/// pass-through account.
pub const OFFICE_PREFIX: &str = "AKS Office";

/// Whether an entry records money in or money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money received by the property.
    Income,
    /// Money paid out by the property.
    Expense,
}

/// Normalized settlement channel.
///
/// Raw payment-mode strings are mapped to one of these variants exactly
/// once, at the system boundary. Downstream aggregation never re-parses
/// free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Physical cash at the desk.
    Cash,
    /// Card terminal capture.
    Card,
    /// Bank transfer, UPI, or any other non-cash direct channel.
    BankTransfer,
    /// The pass-through office account; its cash never touches hotel
    /// accounts directly.
    OfficeAccount,
}

impl Channel {
    /// Maps a raw payment-mode string to a channel.
    ///
    /// `"Cash"` and `"Card"` map to their variants, anything prefixed
    /// with [`OFFICE_PREFIX`] is the office account, and every other
    /// string is treated as a bank transfer.
    #[must_use]
    pub fn from_mode(mode: &str) -> Self {
        let mode = mode.trim();
        if mode.eq_ignore_ascii_case("cash") {
            Self::Cash
        } else if mode.eq_ignore_ascii_case("card") {
            Self::Card
        } else if mode.starts_with(OFFICE_PREFIX) {
            Self::OfficeAccount
        } else {
            Self::BankTransfer
        }
    }

    /// Returns true for the cash bucket; all other channels aggregate
    /// into the bank bucket.
    #[must_use]
    pub const fn is_cash(self) -> bool {
        matches!(self, Self::Cash)
    }

    /// Returns true for the pass-through office channel.
    #[must_use]
    pub const fn is_pass_through(self) -> bool {
        matches!(self, Self::OfficeAccount)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Card => write!(f, "Card"),
            Self::BankTransfer => write!(f, "Bank Transfer"),
            Self::OfficeAccount => write!(f, "{OFFICE_PREFIX}"),
        }
    }
}

/// One dated financial fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier.
    pub id: EntryId,
    /// Calendar day the money moved; the ledger's partition key.
    pub date: NaiveDate,
    /// Income or expense.
    pub kind: EntryKind,
    /// Category, e.g. "Room Rent".
    pub category: String,
    /// Optional source tag, e.g. "Advance" or "Collection".
    pub sub_category: Option<String>,
    /// Amount, strictly positive, rounded to 2 decimal places.
    pub amount: Decimal,
    /// The channel the money actually moved through.
    pub channel: Channel,
    /// Opaque link back to a booking, settlement, or KOT order.
    pub reference: Option<String>,
    /// Free-text description.
    pub description: String,
}

/// Input for appending an entry to the daybook.
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// Calendar day the money moved.
    pub date: NaiveDate,
    /// Income or expense.
    pub kind: EntryKind,
    /// Category.
    pub category: String,
    /// Optional source tag.
    pub sub_category: Option<String>,
    /// Amount; non-positive inputs are silently skipped.
    pub amount: Decimal,
    /// Settlement channel.
    pub channel: Channel,
    /// Opaque back-reference.
    pub reference: Option<String>,
    /// Free-text description.
    pub description: String,
}

/// Filter options for reporting queries over a date range.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Inclusive start of the range.
    pub from: Option<NaiveDate>,
    /// Inclusive end of the range.
    pub to: Option<NaiveDate>,
    /// Restrict to income or expense.
    pub kind: Option<EntryKind>,
    /// Restrict to one category.
    pub category: Option<String>,
    /// Restrict to one channel.
    pub channel: Option<Channel>,
}

impl EntryFilter {
    /// Returns true if the entry passes every set filter.
    #[must_use]
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if self.from.is_some_and(|from| entry.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| entry.date > to) {
            return false;
        }
        if self.kind.is_some_and(|kind| entry.kind != kind) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|category| entry.category != category)
        {
            return false;
        }
        if self.channel.is_some_and(|channel| entry.channel != channel) {
            return false;
        }
        true
    }
}
