use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    Category, CategoryKind, EngineError, OperationInput, OperationKind, ResultEngine, accounts,
    categories,
};

use super::super::{Engine, with_tx};

impl Engine {
    /// Full pre-flight check for `input`: the shape rules of
    /// [`OperationInput::validate`] plus the references it points at.
    ///
    /// Referenced accounts must exist. The category must exist, must not be
    /// a folder and must match the operation type.
    pub async fn validate_operation(&self, input: &OperationInput) -> ResultEngine<()> {
        input.validate()?;
        with_tx!(self, |db_tx| {
            Self::require_account_exists(&db_tx, input.account_id).await?;
            if let Some(to_account_id) = input.to_account_id {
                Self::require_account_exists(&db_tx, to_account_id).await?;
            }

            if let Some(category_id) = input.category_id {
                let model = categories::Entity::find_by_id(category_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(format!("category {category_id}")))?;
                let category = Category::try_from(model)?;
                if category.is_folder {
                    return Err(EngineError::Validation(format!(
                        "category {category_id} is a folder"
                    )));
                }
                let expected = match input.kind {
                    OperationKind::Income => CategoryKind::Income,
                    _ => CategoryKind::Expense,
                };
                if category.kind != expected {
                    return Err(EngineError::Validation(format!(
                        "category {category_id} is an {} category",
                        category.kind.as_str()
                    )));
                }
            }
            Ok(())
        })
    }

    async fn require_account_exists(
        db_tx: &DatabaseTransaction,
        account_id: i64,
    ) -> ResultEngine<()> {
        accounts::Entity::find_by_id(account_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("account {account_id}")))?;
        Ok(())
    }
}
