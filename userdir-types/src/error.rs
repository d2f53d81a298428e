//! Error types for the user directory service.

use crate::domain::UserId;

/// Domain-level errors (business logic violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: i64 },

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Store-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,
}

/// Transfer engine errors.
///
/// The engine recovers every failure at its boundary and returns one of
/// these; none propagate as panics, and every failure path leaves the
/// store untouched.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Invalid transfer request: {0}")]
    InvalidRequest(String),

    #[error("Account not found: {0}")]
    AccountNotFound(UserId),

    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: i64 },

    #[error("Account store error: {0}")]
    Store(String),
}

impl From<DomainError> for TransferError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InsufficientFunds {
                available,
                requested,
            } => TransferError::InsufficientFunds {
                available,
                requested,
            },
            DomainError::UserNotFound(id) => TransferError::AccountNotFound(id),
            other => TransferError::InvalidRequest(other.to_string()),
        }
    }
}

impl From<StoreError> for TransferError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(DomainError::InsufficientFunds {
                available,
                requested,
            }) => TransferError::InsufficientFunds {
                available,
                requested,
            },
            StoreError::Domain(DomainError::UserNotFound(id)) => TransferError::AccountNotFound(id),
            other => TransferError::Store(other.to_string()),
        }
    }
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: i64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(DomainError::InsufficientFunds {
                available,
                requested,
            }) => AppError::InsufficientFunds {
                available,
                requested,
            },
            StoreError::Domain(DomainError::ValidationError(msg)) => AppError::BadRequest(msg),
            StoreError::Domain(DomainError::UserNotFound(id)) => {
                AppError::NotFound(format!("User not found: {}", id))
            }
            StoreError::Domain(e) => AppError::BadRequest(e.to_string()),
            StoreError::NotFound => AppError::NotFound("Resource not found".into()),
            StoreError::Database(e) => AppError::Internal(e),
        }
    }
}

impl From<TransferError> for AppError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::InvalidRequest(msg) => AppError::BadRequest(msg),
            TransferError::AccountNotFound(id) => {
                AppError::NotFound(format!("Account not found: {}", id))
            }
            TransferError::InsufficientFunds {
                available,
                requested,
            } => AppError::InsufficientFunds {
                available,
                requested,
            },
            TransferError::Store(e) => AppError::Internal(e),
        }
    }
}
