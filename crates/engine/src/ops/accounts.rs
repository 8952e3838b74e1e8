use chrono::Utc;

use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Account, Currency, EngineError, Money, ResultEngine, accounts, util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return an account snapshot from DB.
    pub async fn account(&self, account_id: i64) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = accounts::Entity::find_by_id(account_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("account {account_id}")))?;
            Account::try_from(model)
        })
    }

    /// All accounts, ordered by name.
    pub async fn accounts(&self) -> ResultEngine<Vec<Account>> {
        with_tx!(self, |db_tx| {
            let models = accounts::Entity::find()
                .order_by_asc(accounts::Column::Name)
                .order_by_asc(accounts::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Account::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Open a new account.
    ///
    /// `opening_balance` is stored as the starting balance; it is not recorded
    /// as an operation.
    pub async fn new_account(
        &self,
        name: &str,
        currency: Currency,
        opening_balance: &str,
    ) -> ResultEngine<i64> {
        let name = normalize_required_name(name, "account")?;
        let balance: Money = opening_balance.parse()?;
        with_tx!(self, |db_tx| {
            let model = accounts::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                currency: ActiveValue::Set(currency.code().to_string()),
                balance: ActiveValue::Set(balance.to_string()),
                updated_at: ActiveValue::Set(Utc::now()),
            };
            let inserted = model.insert(&db_tx).await?;
            tracing::debug!(account_id = inserted.id, "account opened");
            Ok(inserted.id)
        })
    }
}
