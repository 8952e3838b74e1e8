//! The module contains `Account` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, Money};

/// An account.
///
/// An account is anything where money is kept: cash, a bank account, a card.
/// Its `balance` is maintained incrementally by the engine every time an
/// operation touching it is created, updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub currency: Currency,
    /// Two-decimal balance string, e.g. `"-75.00"`.
    pub balance: String,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Parsed balance.
    pub fn balance(&self) -> Result<Money, EngineError> {
        self.balance.parse()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub currency: String,
    pub balance: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            currency: Currency::try_from(model.currency.as_str())?,
            balance: model.balance,
            updated_at: model.updated_at,
        })
    }
}
