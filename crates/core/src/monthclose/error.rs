//! Month-end close error types.

use folio_shared::AppError;
use folio_shared::types::month::MonthError;
use thiserror::Error;

/// Errors that can occur during month-end close.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthCloseError {
    /// The month could not be resolved.
    #[error(transparent)]
    Month(#[from] MonthError),
}

impl From<MonthCloseError> for AppError {
    fn from(err: MonthCloseError) -> Self {
        Self::Validation(err.to_string())
    }
}
