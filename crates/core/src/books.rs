//! The single-property record store.
//!
//! One `Books` owns every financial record for one hotel: bookings,
//! the daybook, pass-through payments, agent settlements, and the
//! checkpoint stores the carry-forward and month-close engines anchor
//! on. Writes are row-atomic; the engines validate before mutating.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use folio_shared::types::{BookingId, Month, SettlementId, round_currency};

use crate::agent::AgentSettlement;
use crate::balance::BalanceCheckpoint;
use crate::booking::{Booking, PassThroughPayment};
use crate::daybook::Daybook;

/// Prefix of every sequential booking reference.
const REFERENCE_PREFIX: &str = "BK-";

/// All financial records for one hotel property.
#[derive(Debug, Default)]
pub struct Books {
    bookings: HashMap<BookingId, Booking>,
    daybook: Daybook,
    pass_through: Vec<PassThroughPayment>,
    settlements: Vec<AgentSettlement>,
    checkpoints: BTreeMap<NaiveDate, BalanceCheckpoint>,
    agent_openings: HashMap<(String, Month), Decimal>,
}

impl Books {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Bookings ==========

    /// Next sequential booking reference.
    ///
    /// Derived by scanning existing references rather than a counter
    /// record, so externally inserted bookings keep the sequence
    /// monotonic.
    #[must_use]
    pub fn next_reference(&self) -> String {
        let max = self
            .bookings
            .values()
            .filter_map(|b| b.reference.strip_prefix(REFERENCE_PREFIX))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("{REFERENCE_PREFIX}{:04}", max + 1)
    }

    /// Inserts a booking.
    pub fn insert_booking(&mut self, booking: Booking) {
        self.bookings.insert(booking.id, booking);
    }

    /// Looks up a booking by id.
    #[must_use]
    pub fn booking(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.get(&id)
    }

    /// Looks up a booking by id, mutably.
    pub fn booking_mut(&mut self, id: BookingId) -> Option<&mut Booking> {
        self.bookings.get_mut(&id)
    }

    /// Looks up a booking by its human-readable reference.
    #[must_use]
    pub fn booking_by_reference(&self, reference: &str) -> Option<&Booking> {
        self.bookings.values().find(|b| b.reference == reference)
    }

    /// Iterates every booking, soft-deleted ones included.
    pub fn bookings(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.values()
    }

    // ========== Daybook ==========

    /// The daybook.
    #[must_use]
    pub fn daybook(&self) -> &Daybook {
        &self.daybook
    }

    /// The daybook, mutably.
    pub fn daybook_mut(&mut self) -> &mut Daybook {
        &mut self.daybook
    }

    // ========== Pass-through payments ==========

    /// Records a pass-through payment.
    pub fn push_pass_through(&mut self, payment: PassThroughPayment) {
        self.pass_through.push(payment);
    }

    /// Pass-through payments for one booking.
    pub fn pass_through_for(
        &self,
        booking_id: BookingId,
    ) -> impl Iterator<Item = &PassThroughPayment> {
        self.pass_through
            .iter()
            .filter(move |p| p.booking_id == booking_id)
    }

    /// Pass-through payments dated inside a month.
    pub fn pass_through_in(&self, month: Month) -> impl Iterator<Item = &PassThroughPayment> {
        self.pass_through
            .iter()
            .filter(move |p| month.contains(p.date))
    }

    // ========== Agent settlements ==========

    /// Records an agent settlement.
    pub fn push_settlement(&mut self, settlement: AgentSettlement) {
        self.settlements.push(settlement);
    }

    /// Looks up a settlement by id.
    #[must_use]
    pub fn settlement(&self, id: SettlementId) -> Option<&AgentSettlement> {
        self.settlements.iter().find(|s| s.id == id)
    }

    /// Removes a settlement, returning it when present.
    pub fn remove_settlement(&mut self, id: SettlementId) -> Option<AgentSettlement> {
        let index = self.settlements.iter().position(|s| s.id == id)?;
        Some(self.settlements.remove(index))
    }

    /// Iterates every settlement.
    pub fn settlements(&self) -> impl Iterator<Item = &AgentSettlement> {
        self.settlements.iter()
    }

    /// Total settled by one agent inside a month.
    #[must_use]
    pub fn settled_in_month(&self, agent_name: &str, month: Month) -> Decimal {
        self.settlements
            .iter()
            .filter(|s| s.agent_name == agent_name && month.contains(s.date))
            .map(|s| s.amount)
            .sum()
    }

    // ========== Balance checkpoints ==========

    /// Upserts the checkpoint for a date, rounding to currency scale.
    pub fn set_checkpoint(&mut self, checkpoint: BalanceCheckpoint) {
        let checkpoint = BalanceCheckpoint {
            date: checkpoint.date,
            cash: round_currency(checkpoint.cash),
            bank: round_currency(checkpoint.bank),
        };
        self.checkpoints.insert(checkpoint.date, checkpoint);
    }

    /// The checkpoint at exactly this date, if any.
    #[must_use]
    pub fn checkpoint_on(&self, date: NaiveDate) -> Option<&BalanceCheckpoint> {
        self.checkpoints.get(&date)
    }

    /// The most recent checkpoint strictly before this date.
    #[must_use]
    pub fn checkpoint_before(&self, date: NaiveDate) -> Option<&BalanceCheckpoint> {
        self.checkpoints.range(..date).next_back().map(|(_, cp)| cp)
    }

    /// Dates of every checkpoint at or after this date, ascending.
    #[must_use]
    pub fn checkpoint_dates_from(&self, date: NaiveDate) -> Vec<NaiveDate> {
        self.checkpoints.range(date..).map(|(d, _)| *d).collect()
    }

    // ========== Agent month openings ==========

    /// Upserts one agent's opening ledger balance for a month.
    pub fn set_agent_opening(&mut self, agent_name: &str, month: Month, amount: Decimal) {
        self.agent_openings
            .insert((agent_name.to_string(), month), round_currency(amount));
    }

    /// One agent's opening ledger balance for a month; zero when unset.
    #[must_use]
    pub fn agent_opening(&self, agent_name: &str, month: Month) -> Decimal {
        self.agent_openings
            .get(&(agent_name.to_string(), month))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Names of every agent with an explicit opening for a month.
    #[must_use]
    pub fn agents_with_openings(&self, month: Month) -> Vec<String> {
        self.agent_openings
            .keys()
            .filter(|(_, m)| *m == month)
            .map(|(name, _)| name.clone())
            .collect()
    }
}
