//! Agent settlement types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::SettlementId;

use crate::daybook::Channel;

/// A lump payment received from a booking agent against the agent's
/// running ledger balance.
///
/// Always paired 1:1 with a daybook entry of category "Agent Settlement"
/// referencing `SETTLEMENT-<id>`; deleting the settlement deletes the
/// paired entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettlement {
    /// Unique identifier.
    pub id: SettlementId,
    /// The agent who paid.
    pub agent_name: String,
    /// Amount received.
    pub amount: Decimal,
    /// Day the payment arrived.
    pub date: NaiveDate,
    /// Channel the payment arrived through.
    pub mode: Channel,
    /// Free-text reference, e.g. a bank UTR.
    pub reference: Option<String>,
}

impl AgentSettlement {
    /// The reference string linking this settlement to its paired
    /// daybook entry.
    #[must_use]
    pub fn entry_reference(&self) -> String {
        format!("SETTLEMENT-{}", self.id)
    }
}

/// Input for recording an agent settlement.
#[derive(Debug, Clone)]
pub struct SettlementInput {
    /// The agent who paid.
    pub agent_name: String,
    /// Amount received; must be positive.
    pub amount: Decimal,
    /// Day the payment arrived.
    pub date: NaiveDate,
    /// Channel the payment arrived through.
    pub mode: Channel,
    /// Free-text reference.
    pub reference: Option<String>,
}
