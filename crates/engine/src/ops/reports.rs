use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Query,
};

use crate::{Currency, EngineError, Money, OperationKind, ResultEngine, accounts, operations};

use super::{Engine, with_tx};

/// Sum of one category's operations over a period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// `None` groups operations recorded without a category.
    pub category_id: Option<i64>,
    /// Two-decimal total, e.g. `"125.40"`.
    pub total: String,
}

/// A calendar month holding at least one operation. `month` is 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }
}

impl Engine {
    /// Expenses from accounts held in `currency`, dated in `[start, end]`,
    /// summed per category. Largest total first.
    pub async fn spending_by_category_and_currency(
        &self,
        currency: &Currency,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        with_tx!(self, |db_tx| {
            Self::totals_by_category(&db_tx, OperationKind::Expense, currency, start, end).await
        })
    }

    /// Incomes into accounts held in `currency`, dated in `[start, end]`,
    /// summed per category. Largest total first.
    pub async fn income_by_category_and_currency(
        &self,
        currency: &Currency,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        with_tx!(self, |db_tx| {
            Self::totals_by_category(&db_tx, OperationKind::Income, currency, start, end).await
        })
    }

    /// Months that contain operations, newest first.
    pub async fn available_months(&self) -> ResultEngine<Vec<MonthKey>> {
        with_tx!(self, |db_tx| {
            let dates: Vec<NaiveDate> = operations::Entity::find()
                .select_only()
                .column(operations::Column::Date)
                .distinct()
                .order_by_desc(operations::Column::Date)
                .into_tuple()
                .all(&db_tx)
                .await?;

            let mut months: Vec<MonthKey> = Vec::new();
            for date in dates {
                let key = MonthKey::from(date);
                if months.last() != Some(&key) {
                    months.push(key);
                }
            }
            Ok(months)
        })
    }

    async fn totals_by_category(
        db_tx: &DatabaseTransaction,
        kind: OperationKind,
        currency: &Currency,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        if start > end {
            return Err(EngineError::InvalidDate(format!(
                "period starts after it ends: {start} > {end}"
            )));
        }

        let accounts_in_currency = Query::select()
            .column(accounts::Column::Id)
            .from(accounts::Entity)
            .and_where(accounts::Column::Currency.eq(currency.code()))
            .to_owned();

        let rows: Vec<(Option<i64>, String)> = operations::Entity::find()
            .select_only()
            .column(operations::Column::CategoryId)
            .column(operations::Column::Amount)
            .filter(operations::Column::Kind.eq(kind.as_str()))
            .filter(operations::Column::Date.gte(start))
            .filter(operations::Column::Date.lte(end))
            .filter(operations::Column::AccountId.in_subquery(accounts_in_currency))
            .into_tuple()
            .all(db_tx)
            .await?;

        let mut sums: BTreeMap<Option<i64>, Money> = BTreeMap::new();
        for (category_id, amount) in rows {
            let amount: Money = amount.parse()?;
            let sum = sums.entry(category_id).or_insert(Money::ZERO);
            *sum = sum.checked_add(amount).ok_or_else(|| {
                EngineError::InvalidAmount("category total overflows".to_string())
            })?;
        }

        let mut totals: Vec<(Option<i64>, Money)> = sums.into_iter().collect();
        totals.sort_by(|(a_id, a_total), (b_id, b_total)| {
            b_total.cmp(a_total).then_with(|| a_id.cmp(b_id))
        });

        Ok(totals
            .into_iter()
            .map(|(category_id, total)| CategoryTotal {
                category_id,
                total: total.to_string(),
            })
            .collect())
    }
}
