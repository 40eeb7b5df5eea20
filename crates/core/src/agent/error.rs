//! Agent ledger error types.

use folio_shared::AppError;
use thiserror::Error;

/// Errors that can occur recording or deleting agent settlements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentLedgerError {
    /// Settlement not found.
    #[error("Settlement not found: {0}")]
    SettlementNotFound(String),

    /// Amount must be positive.
    #[error("Settlement amount must be positive, got {0}")]
    NonPositiveAmount(rust_decimal::Decimal),

    /// Agent name must not be blank.
    #[error("Agent name must not be blank")]
    BlankAgentName,
}

impl From<AgentLedgerError> for AppError {
    fn from(err: AgentLedgerError) -> Self {
        match &err {
            AgentLedgerError::SettlementNotFound(_) => Self::NotFound(err.to_string()),
            AgentLedgerError::NonPositiveAmount(_) | AgentLedgerError::BlankAgentName => {
                Self::Validation(err.to_string())
            }
        }
    }
}
