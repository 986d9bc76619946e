//! Ledger error taxonomy.
//!
//! Validation failures map to 400, missing records to 404, and storage
//! faults to 500. The daemon turns these into the structured
//! `{ success: false, message }` body; the message text here is what the
//! caller sees.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be a positive number of tokens")]
    InvalidAmount,

    #[error("insufficient tokens: balance is {balance}, tried to spend {requested}")]
    InsufficientBalance { balance: i64, requested: i64 },

    #[error("daily reward already claimed today")]
    AlreadyClaimedToday,

    #[error("percentage must be between 0 and 100")]
    InvalidPercentage,

    #[error("account '{0}' not found")]
    AccountNotFound(String),

    #[error("shop item '{0}' not found")]
    ItemNotFound(String),

    #[error("'{0}' is out of stock")]
    OutOfStock(String),

    #[error("'{0}' is already owned")]
    AlreadyOwned(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// HTTP status the error maps to: validation failures 400, missing
    /// records 404, everything unexpected 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount
            | Self::InsufficientBalance { .. }
            | Self::AlreadyClaimedToday
            | Self::InvalidPercentage
            | Self::OutOfStock(_)
            | Self::AlreadyOwned(_) => 400,
            Self::AccountNotFound(_) | Self::ItemNotFound(_) => 404,
            Self::Storage(_) | Self::Io(_) => 500,
        }
    }

    /// True for the 5xx arms whose details must stay server-side
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(LedgerError::InvalidAmount.status_code(), 400);
        assert_eq!(
            LedgerError::InsufficientBalance {
                balance: 20,
                requested: 30
            }
            .status_code(),
            400
        );
        assert_eq!(LedgerError::AlreadyClaimedToday.status_code(), 400);
        assert_eq!(
            LedgerError::ItemNotFound("x".to_string()).status_code(),
            404
        );
        assert_eq!(
            LedgerError::AccountNotFound("x".to_string()).status_code(),
            404
        );
    }

    #[test]
    fn test_internal_errors_are_500() {
        let err = LedgerError::Storage(rusqlite::Error::InvalidQuery);
        assert_eq!(err.status_code(), 500);
        assert!(err.is_internal());
        assert!(!LedgerError::InvalidAmount.is_internal());
    }
}
