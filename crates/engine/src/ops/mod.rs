use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::ResultEngine;

mod accounts;
mod categories;
mod operations;
mod reports;

pub use operations::{AmountRange, DateRange, OperationFilter, WeekPage};
pub use reports::{CategoryTotal, MonthKey};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// What to do when a balance adjustment targets an account that is gone.
///
/// Operations carry no foreign key to their accounts, so a deleted account
/// can leave operations pointing at nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAccountPolicy {
    /// Log a warning, skip the account and commit the rest.
    #[default]
    Lenient,
    /// Fail with [`crate::EngineError::ReferentialGap`] and roll back.
    Strict,
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    missing_account_policy: MissingAccountPolicy,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn missing_account_policy(&self) -> MissingAccountPolicy {
        self.missing_account_policy
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    missing_account_policy: MissingAccountPolicy,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// How balance writes treat missing accounts. Defaults to lenient.
    pub fn missing_account_policy(mut self, policy: MissingAccountPolicy) -> EngineBuilder {
        self.missing_account_policy = policy;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            missing_account_policy: self.missing_account_policy,
        })
    }
}
