//! External collaborator interfaces.
//!
//! The engine consumes these at its boundary: kitchen-order settlement
//! at checkout, and an append-only audit sink. The core records who did
//! what but never authenticates; the acting user arrives as a plain
//! display name on every mutating operation.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::Books;
use crate::daybook::Channel;

/// Kitchen-order collaborator.
///
/// Called at checkout to settle the booking's unpaid kitchen orders.
/// The implementor emits its own daybook entries for what it settles,
/// channel-aware, under the same normalization rules as the daybook;
/// the returned total is what was settled.
pub trait KitchenOrders {
    /// Settles every unpaid kitchen order for the booking and returns
    /// the settled total.
    fn settle_unpaid_by_booking(
        &mut self,
        books: &mut Books,
        booking_reference: &str,
        channel: Channel,
        actor: &str,
    ) -> Decimal;
}

/// Kitchen collaborator for properties without a kitchen module.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoKitchen;

impl KitchenOrders for NoKitchen {
    fn settle_unpaid_by_booking(
        &mut self,
        _books: &mut Books,
        _booking_reference: &str,
        _channel: Channel,
        _actor: &str,
    ) -> Decimal {
        Decimal::ZERO
    }
}

/// One auditable action.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Who performed the action.
    pub actor: String,
    /// What was done, e.g. "checkout".
    pub action: &'static str,
    /// The record acted on, e.g. a booking reference.
    pub reference: String,
    /// Human-readable detail.
    pub detail: String,
}

/// Error from an audit sink.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink could not accept the event.
    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Append-only audit sink.
///
/// The engine never depends on its success: failures are logged and
/// swallowed so a broken audit trail cannot fail a financial operation.
pub trait AuditSink {
    /// Records one event.
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// Audit sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAudit;

impl AuditSink for NoopAudit {
    fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        Ok(())
    }
}

/// Records an event, swallowing sink failures.
pub(crate) fn record_audit(sink: &dyn AuditSink, event: &AuditEvent) {
    if let Err(err) = sink.record(event) {
        warn!(
            action = event.action,
            reference = %event.reference,
            error = %err,
            "audit sink failed; continuing"
        );
    }
}
