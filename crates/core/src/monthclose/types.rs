//! Month-end close result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::Month;

/// One agent's ledger position for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentClosing {
    /// Agent name, or the office entity.
    pub agent_name: String,
    /// Opening ledger balance for the month.
    pub opening: Decimal,
    /// Earned during the month: pass-through amounts for the office
    /// entity, positive outstanding balances on Ledger-type bookings
    /// for ordinary agents.
    pub earned: Decimal,
    /// Settled during the month.
    pub settled: Decimal,
    /// Closing balance: opening + earned - settled.
    pub closing: Decimal,
}

/// The complete close for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthClose {
    /// The month closed.
    pub month: Month,
    /// Cash closing on the month's last calendar day.
    pub cash_closing: Decimal,
    /// Bank closing on the month's last calendar day.
    pub bank_closing: Decimal,
    /// Per-agent closings, office entity included, sorted by name.
    pub agents: Vec<AgentClosing>,
}

impl MonthClose {
    /// Looks up one agent's closing.
    #[must_use]
    pub fn agent(&self, agent_name: &str) -> Option<&AgentClosing> {
        self.agents.iter().find(|a| a.agent_name == agent_name)
    }
}
