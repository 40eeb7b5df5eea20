//! Recording and deleting agent settlements.

use rust_decimal::Decimal;
use tracing::info;

use folio_shared::types::{SettlementId, round_currency};

use crate::Books;
use crate::collab::{AuditEvent, AuditSink, record_audit};
use crate::daybook::{EntryInput, EntryKind};

use super::error::AgentLedgerError;
use super::types::{AgentSettlement, SettlementInput};

/// Entry category for the paired daybook entry.
pub const CATEGORY_AGENT_SETTLEMENT: &str = "Agent Settlement";

/// Agent settlement operations.
pub struct AgentLedgerService;

impl AgentLedgerService {
    /// Records a settlement and its paired daybook income entry.
    pub fn record(
        books: &mut Books,
        input: SettlementInput,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> Result<SettlementId, AgentLedgerError> {
        let agent_name = input.agent_name.trim();
        if agent_name.is_empty() {
            return Err(AgentLedgerError::BlankAgentName);
        }
        let amount = round_currency(input.amount);
        if amount <= Decimal::ZERO {
            return Err(AgentLedgerError::NonPositiveAmount(amount));
        }

        let settlement = AgentSettlement {
            id: SettlementId::new(),
            agent_name: agent_name.to_string(),
            amount,
            date: input.date,
            mode: input.mode,
            reference: input.reference,
        };
        let id = settlement.id;
        let entry_reference = settlement.entry_reference();

        books.daybook_mut().append(EntryInput {
            date: settlement.date,
            kind: EntryKind::Income,
            category: CATEGORY_AGENT_SETTLEMENT.to_string(),
            sub_category: None,
            amount,
            channel: settlement.mode,
            reference: Some(entry_reference.clone()),
            description: format!("Settlement from {agent_name}"),
        });
        books.push_settlement(settlement);

        info!(agent = agent_name, %amount, "agent settlement recorded");
        record_audit(
            audit,
            &AuditEvent {
                actor: actor.to_string(),
                action: "record_settlement",
                reference: entry_reference,
                detail: format!("{amount} from {agent_name}"),
            },
        );
        Ok(id)
    }

    /// Deletes a settlement and cascades to its paired entry.
    pub fn delete(
        books: &mut Books,
        id: SettlementId,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> Result<(), AgentLedgerError> {
        let settlement = books
            .remove_settlement(id)
            .ok_or_else(|| AgentLedgerError::SettlementNotFound(id.to_string()))?;
        let entry_reference = settlement.entry_reference();
        let removed = books
            .daybook_mut()
            .delete_by_reference(&entry_reference, Some(CATEGORY_AGENT_SETTLEMENT));

        info!(
            agent = %settlement.agent_name,
            removed_entries = removed,
            "agent settlement deleted"
        );
        record_audit(
            audit,
            &AuditEvent {
                actor: actor.to_string(),
                action: "delete_settlement",
                reference: entry_reference,
                detail: format!("{} from {}", settlement.amount, settlement.agent_name),
            },
        );
        Ok(())
    }
}
