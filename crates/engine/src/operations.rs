//! Operation primitives.
//!
//! An `Operation` is a single financial event (expense, income or transfer)
//! recorded against one or two accounts. This module also owns the mapping
//! between the stored row (snake_case columns) and the application shape
//! (camelCase when serialized).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, money,
    util::normalize_optional_text,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Expense,
    Income,
    Transfer,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [Self::Expense, Self::Income, Self::Transfer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
        }
    }
}

impl TryFrom<&str> for OperationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            "transfer" => Ok(Self::Transfer),
            other => Err(EngineError::InvalidKind(format!(
                "invalid operation type: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored operation, as handed to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    /// Two-decimal amount in the source account currency.
    pub amount: String,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub to_account_id: Option<i64>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub description: Option<String>,
    pub exchange_rate: Option<String>,
    /// Amount credited to `to_account_id` when its currency differs.
    pub destination_amount: Option<String>,
    pub source_currency: Option<String>,
    pub destination_currency: Option<String>,
}

/// Everything needed to record a new operation.
///
/// Inputs are expected to be validated by the caller (see
/// [`OperationInput::validate`]); the engine only normalizes amounts and text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInput {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub amount: String,
    pub account_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub to_account_id: Option<i64>,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exchange_rate: Option<String>,
    #[serde(default)]
    pub destination_amount: Option<String>,
    #[serde(default)]
    pub source_currency: Option<String>,
    #[serde(default)]
    pub destination_currency: Option<String>,
}

impl OperationInput {
    fn base(kind: OperationKind, account_id: i64, amount: &str, date: NaiveDate) -> Self {
        Self {
            kind,
            amount: amount.to_string(),
            account_id,
            category_id: None,
            to_account_id: None,
            date,
            description: None,
            exchange_rate: None,
            destination_amount: None,
            source_currency: None,
            destination_currency: None,
        }
    }

    pub fn expense(account_id: i64, category_id: i64, amount: &str, date: NaiveDate) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::base(OperationKind::Expense, account_id, amount, date)
        }
    }

    pub fn income(account_id: i64, category_id: i64, amount: &str, date: NaiveDate) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::base(OperationKind::Income, account_id, amount, date)
        }
    }

    pub fn transfer(from_account_id: i64, to_account_id: i64, amount: &str, date: NaiveDate) -> Self {
        Self {
            to_account_id: Some(to_account_id),
            ..Self::base(OperationKind::Transfer, from_account_id, amount, date)
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Marks a transfer as cross-currency: the destination is credited
    /// `destination_amount` instead of `amount`.
    #[must_use]
    pub fn with_conversion(
        mut self,
        destination_amount: &str,
        exchange_rate: Option<&str>,
        source_currency: &str,
        destination_currency: &str,
    ) -> Self {
        self.destination_amount = Some(destination_amount.to_string());
        self.exchange_rate = exchange_rate.map(ToString::to_string);
        self.source_currency = Some(source_currency.to_string());
        self.destination_currency = Some(destination_currency.to_string());
        self
    }

    pub(crate) fn into_active_model(self, created_at: DateTime<Utc>) -> ResultEngine<ActiveModel> {
        Ok(ActiveModel {
            id: ActiveValue::NotSet,
            kind: ActiveValue::Set(self.kind.as_str().to_string()),
            amount: ActiveValue::Set(money::canonical(&self.amount)?),
            account_id: ActiveValue::Set(self.account_id),
            category_id: ActiveValue::Set(self.category_id),
            to_account_id: ActiveValue::Set(self.to_account_id),
            date: ActiveValue::Set(self.date),
            created_at: ActiveValue::Set(created_at),
            description: ActiveValue::Set(normalize_optional_text(self.description.as_deref())),
            exchange_rate: ActiveValue::Set(normalize_optional_text(self.exchange_rate.as_deref())),
            destination_amount: ActiveValue::Set(
                self.destination_amount
                    .as_deref()
                    .map(money::canonical)
                    .transpose()?,
            ),
            source_currency: ActiveValue::Set(self.source_currency),
            destination_currency: ActiveValue::Set(self.destination_currency),
        })
    }
}

impl From<&Operation> for OperationInput {
    fn from(op: &Operation) -> Self {
        Self {
            kind: op.kind,
            amount: op.amount.clone(),
            account_id: op.account_id,
            category_id: op.category_id,
            to_account_id: op.to_account_id,
            date: op.date,
            description: op.description.clone(),
            exchange_rate: op.exchange_rate.clone(),
            destination_amount: op.destination_amount.clone(),
            source_currency: op.source_currency.clone(),
            destination_currency: op.destination_currency.clone(),
        }
    }
}

/// Partial update of an operation.
///
/// `None` leaves the column untouched. Nullable columns use a nested
/// `Option`: `Some(None)` clears the value, `Some(Some(v))` sets it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationPatch {
    pub kind: Option<OperationKind>,
    pub amount: Option<String>,
    pub account_id: Option<i64>,
    pub category_id: Option<Option<i64>>,
    pub to_account_id: Option<Option<i64>>,
    pub date: Option<NaiveDate>,
    pub description: Option<Option<String>>,
    pub exchange_rate: Option<Option<String>>,
    pub destination_amount: Option<Option<String>>,
    pub source_currency: Option<Option<String>>,
    pub destination_currency: Option<Option<String>>,
}

fn patch_value<T>(value: Option<T>) -> ActiveValue<T>
where
    T: Into<sea_orm::Value>,
{
    match value {
        Some(v) => ActiveValue::Set(v),
        None => ActiveValue::NotSet,
    }
}

impl OperationPatch {
    /// Returns `true` when the patch would not touch any column.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Builds the write set for `id`: only the fields present in the patch are
    /// `Set`, everything else stays `NotSet`.
    pub(crate) fn into_active_model(self, id: i64) -> ResultEngine<ActiveModel> {
        let amount = self.amount.as_deref().map(money::canonical).transpose()?;
        let destination_amount = match self.destination_amount {
            Some(Some(value)) => Some(Some(money::canonical(&value)?)),
            other => other,
        };

        Ok(ActiveModel {
            id: ActiveValue::Unchanged(id),
            kind: patch_value(self.kind.map(|k| k.as_str().to_string())),
            amount: patch_value(amount),
            account_id: patch_value(self.account_id),
            category_id: patch_value(self.category_id),
            to_account_id: patch_value(self.to_account_id),
            date: patch_value(self.date),
            created_at: ActiveValue::NotSet,
            description: patch_value(
                self.description
                    .map(|d| normalize_optional_text(d.as_deref())),
            ),
            exchange_rate: patch_value(
                self.exchange_rate
                    .map(|r| normalize_optional_text(r.as_deref())),
            ),
            destination_amount: patch_value(destination_amount),
            source_currency: patch_value(self.source_currency),
            destination_currency: patch_value(self.destination_currency),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub amount: String,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub to_account_id: Option<i64>,
    pub date: Date,
    pub created_at: DateTimeUtc,
    pub description: Option<String>,
    pub exchange_rate: Option<String>,
    pub destination_amount: Option<String>,
    pub source_currency: Option<String>,
    pub destination_currency: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Operation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            kind: OperationKind::try_from(model.kind.as_str())?,
            amount: model.amount,
            account_id: model.account_id,
            category_id: model.category_id,
            to_account_id: model.to_account_id,
            date: model.date,
            created_at: model.created_at,
            description: model.description,
            exchange_rate: model.exchange_rate,
            destination_amount: model.destination_amount,
            source_currency: model.source_currency,
            destination_currency: model.destination_currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn model() -> Model {
        Model {
            id: 7,
            kind: "transfer".to_string(),
            amount: "100.00".to_string(),
            account_id: 1,
            category_id: None,
            to_account_id: Some(2),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap(),
            description: Some("rent share".to_string()),
            exchange_rate: Some("0.92".to_string()),
            destination_amount: Some("92.00".to_string()),
            source_currency: Some("USD".to_string()),
            destination_currency: Some("EUR".to_string()),
        }
    }

    #[test]
    fn maps_row_to_camel_case_shape() {
        let op = Operation::try_from(model()).unwrap();
        assert_eq!(op.kind, OperationKind::Transfer);

        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "transfer");
        assert_eq!(json["accountId"], 1);
        assert_eq!(json["toAccountId"], 2);
        assert_eq!(json["categoryId"], serde_json::Value::Null);
        assert_eq!(json["destinationAmount"], "92.00");
        assert_eq!(json["sourceCurrency"], "USD");
        assert_eq!(json["date"], "2025-01-15");
        assert!(json.get("account_id").is_none());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut row = model();
        row.kind = "refund".to_string();
        assert_eq!(
            Operation::try_from(row),
            Err(EngineError::InvalidKind(
                "invalid operation type: refund".to_string()
            ))
        );
    }

    #[test]
    fn input_is_canonicalized() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let input = OperationInput::transfer(1, 2, "100", date)
            .with_description("  ")
            .with_conversion("85,5", Some("0.855"), "USD", "EUR");
        let active = input.into_active_model(Utc::now()).unwrap();

        assert_eq!(active.amount, ActiveValue::Set("100.00".to_string()));
        assert_eq!(
            active.destination_amount,
            ActiveValue::Set(Some("85.50".to_string()))
        );
        assert_eq!(active.description, ActiveValue::Set(None));
        assert_eq!(active.kind, ActiveValue::Set("transfer".to_string()));
    }

    #[test]
    fn patch_only_sets_present_fields() {
        let patch = OperationPatch {
            amount: Some("75".to_string()),
            category_id: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        let active = patch.into_active_model(3).unwrap();
        assert_eq!(active.id, ActiveValue::Unchanged(3));
        assert_eq!(active.amount, ActiveValue::Set("75.00".to_string()));
        assert_eq!(active.category_id, ActiveValue::Set(None));
        assert_eq!(active.kind, ActiveValue::NotSet);
        assert_eq!(active.account_id, ActiveValue::NotSet);
        assert_eq!(active.date, ActiveValue::NotSet);
        assert_eq!(active.created_at, ActiveValue::NotSet);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(OperationPatch::default().is_empty());
    }
}
