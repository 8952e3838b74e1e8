//! Balance deltas implied by an operation.
//!
//! Every balance change in the engine is derived from these maps: create
//! applies them, delete applies their negation, update applies
//! `new − old`.

use std::collections::BTreeMap;

use crate::{EngineError, Money, Operation, OperationKind, ResultEngine};

/// Signed balance change per account id.
pub type BalanceChanges = BTreeMap<i64, Money>;

/// Computes the balance change every affected account receives from `op`.
///
/// - expense: `{account: -amount}`
/// - income: `{account: +amount}`
/// - transfer: `{account: -amount, to_account: +credit}` where `credit` is
///   `destination_amount` when present, `amount` otherwise
///
/// A transfer without destination, or towards its own source, is rejected
/// rather than reduced to a bare debit.
pub fn balance_changes(op: &Operation) -> ResultEngine<BalanceChanges> {
    let amount: Money = op.amount.parse()?;
    let mut changes = BalanceChanges::new();

    match op.kind {
        OperationKind::Expense => {
            changes.insert(op.account_id, -amount);
        }
        OperationKind::Income => {
            changes.insert(op.account_id, amount);
        }
        OperationKind::Transfer => {
            let to_account_id = op.to_account_id.ok_or_else(|| {
                EngineError::Validation(format!(
                    "transfer {} has no destination account",
                    op.id
                ))
            })?;
            if to_account_id == op.account_id {
                return Err(EngineError::Validation(format!(
                    "transfer {} has the same source and destination",
                    op.id
                )));
            }
            let credit = match op.destination_amount.as_deref() {
                Some(destination_amount) => destination_amount.parse()?,
                None => amount,
            };
            changes.insert(op.account_id, -amount);
            changes.insert(to_account_id, credit);
        }
    }

    Ok(changes)
}

/// Negates every change (the effect of removing an operation).
pub fn reverse(changes: &BalanceChanges) -> BalanceChanges {
    changes.iter().map(|(id, delta)| (*id, -*delta)).collect()
}

/// Nets two change sets: the result is `new − old` for every account present
/// in either map (a missing entry counts as zero).
///
/// Fails with `InvalidAmount` when a netted delta leaves the `i64` cent range.
pub fn net_changes(old: &BalanceChanges, new: &BalanceChanges) -> ResultEngine<BalanceChanges> {
    let overflow = |account_id: i64| {
        EngineError::InvalidAmount(format!("balance change overflow on account {account_id}"))
    };

    let mut out = BalanceChanges::new();
    for (&account_id, &delta) in old {
        out.insert(account_id, delta.checked_neg().ok_or_else(|| overflow(account_id))?);
    }
    for (&account_id, &delta) in new {
        let entry = out.entry(account_id).or_insert(Money::ZERO);
        *entry = entry
            .checked_add(delta)
            .ok_or_else(|| overflow(account_id))?;
    }
    Ok(out)
}
