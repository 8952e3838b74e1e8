use chrono::Utc;

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    EngineError, Operation, OperationInput, OperationPatch, ResultEngine, accounts,
    deltas::{BalanceChanges, balance_changes, net_changes, reverse},
    money, operations,
};

use super::super::{Engine, MissingAccountPolicy, with_tx};

impl Engine {
    /// Records a new operation together with its balance effect.
    ///
    /// `created_at` is stamped here (UTC). Input is stored as given apart from
    /// amount/text normalization; run [`OperationInput::validate`] or
    /// [`Engine::validate_operation`] first.
    pub async fn create_operation(&self, input: OperationInput) -> ResultEngine<Operation> {
        let active = input.into_active_model(Utc::now())?;
        with_tx!(self, |db_tx| {
            let model = active.insert(&db_tx).await?;
            let operation = Operation::try_from(model)?;

            let changes = balance_changes(&operation)?;
            self.apply_balance_changes(&db_tx, operation.id, &changes)
                .await?;

            tracing::debug!(
                operation_id = operation.id,
                kind = %operation.kind,
                accounts = ?changes.keys().collect::<Vec<_>>(),
                "operation created"
            );
            Ok(operation)
        })
    }

    /// Updates the fields present in `patch` and moves balances by
    /// `new effect − old effect`.
    ///
    /// Returns the stored operation after the update. An empty patch changes
    /// nothing but still fails with `NotFound` for an unknown id.
    pub async fn update_operation(
        &self,
        operation_id: i64,
        patch: OperationPatch,
    ) -> ResultEngine<Operation> {
        with_tx!(self, |db_tx| {
            let old = self.require_operation(&db_tx, operation_id).await?;
            if patch.is_empty() {
                Ok(old)
            } else {
                patch.into_active_model(operation_id)?.update(&db_tx).await?;
                let new = self.require_operation(&db_tx, operation_id).await?;

                let changes = net_changes(&balance_changes(&old)?, &balance_changes(&new)?)?;
                self.apply_balance_changes(&db_tx, operation_id, &changes)
                    .await?;

                tracing::debug!(
                    operation_id,
                    accounts = ?changes.keys().collect::<Vec<_>>(),
                    "operation updated"
                );
                Ok(new)
            }
        })
    }

    /// Deletes an operation and reverses its balance effect.
    ///
    /// Returns the removed operation.
    pub async fn delete_operation(&self, operation_id: i64) -> ResultEngine<Operation> {
        with_tx!(self, |db_tx| {
            let old = self.require_operation(&db_tx, operation_id).await?;
            operations::Entity::delete_by_id(operation_id)
                .exec(&db_tx)
                .await?;

            let changes = reverse(&balance_changes(&old)?);
            self.apply_balance_changes(&db_tx, operation_id, &changes)
                .await?;

            tracing::debug!(
                operation_id,
                accounts = ?changes.keys().collect::<Vec<_>>(),
                "operation deleted"
            );
            Ok(old)
        })
    }

    /// Adds every non-zero delta to the matching account balance.
    ///
    /// Missing accounts follow the engine's [`MissingAccountPolicy`].
    async fn apply_balance_changes(
        &self,
        db_tx: &DatabaseTransaction,
        operation_id: i64,
        changes: &BalanceChanges,
    ) -> ResultEngine<()> {
        let now = Utc::now();
        for (&account_id, &delta) in changes {
            if delta.is_zero() {
                continue;
            }

            let Some(model) = accounts::Entity::find_by_id(account_id).one(db_tx).await? else {
                match self.missing_account_policy {
                    MissingAccountPolicy::Strict => {
                        return Err(EngineError::ReferentialGap(account_id));
                    }
                    MissingAccountPolicy::Lenient => {
                        tracing::warn!(
                            operation_id,
                            account_id,
                            %delta,
                            "account not found, balance left untouched"
                        );
                        continue;
                    }
                }
            };

            let balance = money::add(&model.balance, delta)?;
            let account = accounts::ActiveModel {
                id: ActiveValue::Unchanged(account_id),
                balance: ActiveValue::Set(balance),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            account.update(db_tx).await?;
        }
        Ok(())
    }
}
