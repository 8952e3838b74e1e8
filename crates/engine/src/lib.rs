//! Ledger core: operations, account balances and weekly listings.
//!
//! Every write goes through [`Engine`], which keeps each account balance equal
//! to its opening balance plus the effect of every operation touching it.

pub use accounts::Account;
pub use categories::{Category, CategoryKind};
pub use currency::Currency;
pub use deltas::{BalanceChanges, balance_changes, net_changes, reverse};
pub use error::EngineError;
pub use money::Money;
pub use operations::{Operation, OperationInput, OperationKind, OperationPatch};
pub use ops::{
    AmountRange, CategoryTotal, DateRange, Engine, EngineBuilder, MissingAccountPolicy, MonthKey,
    OperationFilter, WeekPage,
};
pub use window::WeekWindow;

mod accounts;
mod categories;
mod currency;
mod deltas;
mod error;
pub mod money;
mod operations;
mod ops;
mod util;
mod validation;
mod window;

pub type ResultEngine<T> = Result<T, EngineError>;
