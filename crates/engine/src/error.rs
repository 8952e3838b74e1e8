//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`NotFound`] thrown when an operation, account or category does not exist.
//! - [`ReferentialGap`] thrown, under the strict policy, when a balance
//!   adjustment targets an account that no longer exists.
//! - [`Validation`] thrown when an operation violates the shape required by its
//!   type (missing category, missing destination, ...).
//! - [`Database`] for everything surfaced by the store; the surrounding
//!   transaction is rolled back.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`ReferentialGap`]: EngineError::ReferentialGap
//!  [`Validation`]: EngineError::Validation
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("account {0} does not exist")]
    ReferentialGap(i64),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid kind: {0}")]
    InvalidKind(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ReferentialGap(a), Self::ReferentialGap(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidCurrency(a), Self::InvalidCurrency(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
