use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{EngineError, Operation, ResultEngine, operations};

use super::{Engine, with_tx};

mod list;
mod validate;
mod write;

pub use list::{AmountRange, DateRange, OperationFilter, WeekPage};

impl Engine {
    /// Return an operation from DB.
    pub async fn operation(&self, operation_id: i64) -> ResultEngine<Operation> {
        with_tx!(self, |db_tx| {
            self.require_operation(&db_tx, operation_id).await
        })
    }

    pub(super) async fn require_operation(
        &self,
        db_tx: &DatabaseTransaction,
        operation_id: i64,
    ) -> ResultEngine<Operation> {
        let model = operations::Entity::find_by_id(operation_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("operation {operation_id}")))?;
        Operation::try_from(model)
    }
}
