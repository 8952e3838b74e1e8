//! Shape checks for operation input.
//!
//! The mutation engine trusts its input; callers run these checks before
//! handing an [`OperationInput`] to [`crate::Engine::create_operation`].

use crate::{EngineError, Money, OperationInput, OperationKind, ResultEngine};

fn positive_amount(value: &str, field: &str) -> ResultEngine<Money> {
    let amount: Money = value.parse()?;
    if !amount.is_positive() {
        return Err(EngineError::Validation(format!("{field} must be > 0")));
    }
    Ok(amount)
}

impl OperationInput {
    /// Checks the fields required (or forbidden) by the operation type.
    ///
    /// - `amount` parses and is positive
    /// - expense/income carry a category and no destination account
    /// - transfers carry a destination different from the source and no
    ///   category
    /// - `destination_amount`, when given, parses and is positive
    pub fn validate(&self) -> ResultEngine<()> {
        positive_amount(&self.amount, "amount")?;

        match self.kind {
            OperationKind::Expense | OperationKind::Income => {
                if self.category_id.is_none() {
                    return Err(EngineError::Validation(format!(
                        "{} requires a category",
                        self.kind
                    )));
                }
                if self.to_account_id.is_some() {
                    return Err(EngineError::Validation(format!(
                        "{} cannot have a destination account",
                        self.kind
                    )));
                }
                if self.destination_amount.is_some() {
                    return Err(EngineError::Validation(format!(
                        "{} cannot have a destination amount",
                        self.kind
                    )));
                }
            }
            OperationKind::Transfer => {
                let Some(to_account_id) = self.to_account_id else {
                    return Err(EngineError::Validation(
                        "transfer requires a destination account".to_string(),
                    ));
                };
                if to_account_id == self.account_id {
                    return Err(EngineError::Validation(
                        "transfer source and destination must differ".to_string(),
                    ));
                }
                if self.category_id.is_some() {
                    return Err(EngineError::Validation(
                        "transfer cannot have a category".to_string(),
                    ));
                }
            }
        }

        if let Some(destination_amount) = self.destination_amount.as_deref() {
            positive_amount(destination_amount, "destination amount")?;
        }

        Ok(())
    }
}
