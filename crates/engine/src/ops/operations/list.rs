use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sea_orm::{
    Condition, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait, prelude::*,
};

use crate::{
    Money, Operation, OperationKind, ResultEngine, WeekWindow, accounts, categories, operations,
};

use super::super::{Engine, with_tx};

/// Inclusive date bounds, applied on top of the week window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Inclusive bounds on the stored amount.
///
/// Amounts are stored as positive magnitudes for every kind, so the bounds
/// never depend on whether the operation is an expense or an income.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AmountRange {
    pub min: Option<Money>,
    pub max: Option<Money>,
}

/// Criteria for listing operations, combined with AND.
///
/// Empty sets, blank search text and absent ranges do not restrict anything:
/// `OperationFilter::default()` lists the same rows as the unfiltered calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationFilter {
    pub types: BTreeSet<OperationKind>,
    /// Matches either side of a transfer.
    pub account_ids: BTreeSet<i64>,
    pub category_ids: BTreeSet<i64>,
    /// Case-insensitive (Unicode) substring over description, amount, account
    /// names and category name.
    pub search_text: Option<String>,
    pub date_range: Option<DateRange>,
    pub amount_range: Option<AmountRange>,
}

impl OperationFilter {
    /// Returns `true` when the filter restricts nothing.
    pub fn is_empty(&self) -> bool {
        self.restricted_types().is_none()
            && self.account_ids.is_empty()
            && self.category_ids.is_empty()
            && self.search_needle().is_none()
            && self.date_range.is_none()
            && self
                .amount_range
                .is_none_or(|range| range.min.is_none() && range.max.is_none())
    }

    /// Kinds to restrict to, or `None` when every kind passes.
    fn restricted_types(&self) -> Option<Vec<&'static str>> {
        if self.types.is_empty() || self.types.len() == OperationKind::ALL.len() {
            return None;
        }
        Some(self.types.iter().map(|k| k.as_str()).collect())
    }

    /// Trimmed, lowercased search text, or `None` when blank.
    fn search_needle(&self) -> Option<String> {
        let text = self.search_text.as_deref()?.trim();
        (!text.is_empty()).then(|| text.to_lowercase())
    }
}

/// One week of operations, as returned by [`Engine::older_week`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPage {
    pub window: WeekWindow,
    pub operations: Vec<Operation>,
}

const AMOUNT_CENTS: &str = "CAST(ROUND(CAST(\"operations\".\"amount\" AS REAL) * 100) AS INTEGER)";

trait ApplyOperationFilter: QueryFilter + Sized {
    fn apply_operation_filter(self, filter: &OperationFilter) -> Self;
}

impl<T> ApplyOperationFilter for T
where
    T: QueryFilter + Sized,
{
    fn apply_operation_filter(mut self, filter: &OperationFilter) -> Self {
        if let Some(kinds) = filter.restricted_types() {
            self = self.filter(operations::Column::Kind.is_in(kinds));
        }

        if !filter.account_ids.is_empty() {
            let ids = filter.account_ids.iter().copied().collect::<Vec<_>>();
            self = self.filter(
                Condition::any()
                    .add(operations::Column::AccountId.is_in(ids.clone()))
                    .add(operations::Column::ToAccountId.is_in(ids)),
            );
        }

        if !filter.category_ids.is_empty() {
            self = self.filter(
                operations::Column::CategoryId.is_in(filter.category_ids.iter().copied()),
            );
        }

        if let Some(range) = filter.amount_range {
            if let Some(min) = range.min {
                self = self.filter(Expr::cust_with_values(
                    format!("{AMOUNT_CENTS} >= ?"),
                    [min.cents()],
                ));
            }
            if let Some(max) = range.max {
                self = self.filter(Expr::cust_with_values(
                    format!("{AMOUNT_CENTS} <= ?"),
                    [max.cents()],
                ));
            }
        }

        if let Some(range) = filter.date_range {
            self = self.filter(operations::Column::Date.gte(range.start));
            self = self.filter(operations::Column::Date.lte(range.end));
        }

        self
    }
}

/// Ids of the operations in `scope` whose description, amount, account names
/// or category name contain `needle`.
///
/// SQLite `lower()` and `LIKE` only fold ASCII, so matching happens here with
/// Unicode lowercasing on both sides.
async fn search_matches(
    db_tx: &DatabaseTransaction,
    needle: &str,
    scope: Condition,
) -> ResultEngine<Vec<i64>> {
    let matches = |text: &str| text.to_lowercase().contains(needle);

    let matching_accounts: HashSet<i64> = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Id)
        .column(accounts::Column::Name)
        .into_tuple::<(i64, String)>()
        .all(db_tx)
        .await?
        .into_iter()
        .filter_map(|(id, name)| matches(&name).then_some(id))
        .collect();
    let matching_categories: HashSet<i64> = categories::Entity::find()
        .select_only()
        .column(categories::Column::Id)
        .column(categories::Column::Name)
        .into_tuple::<(i64, String)>()
        .all(db_tx)
        .await?
        .into_iter()
        .filter_map(|(id, name)| matches(&name).then_some(id))
        .collect();

    let rows = operations::Entity::find()
        .select_only()
        .column(operations::Column::Id)
        .column(operations::Column::Description)
        .column(operations::Column::Amount)
        .column(operations::Column::AccountId)
        .column(operations::Column::ToAccountId)
        .column(operations::Column::CategoryId)
        .filter(scope)
        .into_tuple::<(i64, Option<String>, String, i64, Option<i64>, Option<i64>)>()
        .all(db_tx)
        .await?;

    Ok(rows
        .into_iter()
        .filter(|(_, description, amount, account_id, to_account_id, category_id)| {
            description.as_deref().is_some_and(matches)
                || amount.contains(needle)
                || matching_accounts.contains(account_id)
                || to_account_id.is_some_and(|id| matching_accounts.contains(&id))
                || category_id.is_some_and(|id| matching_categories.contains(&id))
        })
        .map(|(id, ..)| id)
        .collect())
}

/// Operations in `scope` passing `filter`, unordered.
async fn filtered(
    db_tx: &DatabaseTransaction,
    scope: Condition,
    filter: &OperationFilter,
) -> ResultEngine<Select<operations::Entity>> {
    let mut query = operations::Entity::find()
        .filter(scope.clone())
        .apply_operation_filter(filter);
    if let Some(needle) = filter.search_needle() {
        let ids = search_matches(db_tx, &needle, scope).await?;
        query = query.filter(operations::Column::Id.is_in(ids));
    }
    Ok(query)
}

/// Newest first; `id` settles rows created in the same instant.
fn newest_first(query: Select<operations::Entity>) -> Select<operations::Entity> {
    query
        .order_by_desc(operations::Column::Date)
        .order_by_desc(operations::Column::CreatedAt)
        .order_by_desc(operations::Column::Id)
}

fn into_operations(models: Vec<operations::Model>) -> ResultEngine<Vec<Operation>> {
    models.into_iter().map(Operation::try_from).collect()
}

impl Engine {
    /// Operations dated inside week `offset` counted back from `today`.
    pub async fn operations_by_week_offset(
        &self,
        today: NaiveDate,
        offset: u32,
    ) -> ResultEngine<Vec<Operation>> {
        self.filtered_operations_by_week_offset(today, offset, &OperationFilter::default())
            .await
    }

    /// Like [`Engine::operations_by_week_offset`], restricted by `filter`.
    pub async fn filtered_operations_by_week_offset(
        &self,
        today: NaiveDate,
        offset: u32,
        filter: &OperationFilter,
    ) -> ResultEngine<Vec<Operation>> {
        let window = WeekWindow::for_offset(today, offset)?;
        with_tx!(self, |db_tx| {
            Self::operations_in_window(&db_tx, window, filter).await
        })
    }

    /// Operations dated in the seven days ending on `end`.
    pub async fn operations_by_week_from_date(
        &self,
        end: NaiveDate,
    ) -> ResultEngine<Vec<Operation>> {
        self.filtered_operations_by_week_from_date(end, &OperationFilter::default())
            .await
    }

    /// Like [`Engine::operations_by_week_from_date`], restricted by `filter`.
    pub async fn filtered_operations_by_week_from_date(
        &self,
        end: NaiveDate,
        filter: &OperationFilter,
    ) -> ResultEngine<Vec<Operation>> {
        let window = WeekWindow::ending_at(end)?;
        with_tx!(self, |db_tx| {
            Self::operations_in_window(&db_tx, window, filter).await
        })
    }

    /// The most recent operation dated strictly before `before`, if any.
    pub async fn next_oldest_operation(
        &self,
        before: NaiveDate,
    ) -> ResultEngine<Option<Operation>> {
        self.next_oldest_filtered_operation(before, &OperationFilter::default())
            .await
    }

    /// Like [`Engine::next_oldest_operation`], restricted by `filter`.
    pub async fn next_oldest_filtered_operation(
        &self,
        before: NaiveDate,
        filter: &OperationFilter,
    ) -> ResultEngine<Option<Operation>> {
        with_tx!(self, |db_tx| {
            Self::next_oldest(&db_tx, before, filter).await
        })
    }

    /// Loads the next page of a newest → oldest walk.
    ///
    /// Finds the most recent operation before `before` and returns the week
    /// ending on its date. `None` means there is nothing older. Pass the
    /// returned `window.start` as the next `before` to keep walking.
    pub async fn older_week(
        &self,
        before: NaiveDate,
        filter: &OperationFilter,
    ) -> ResultEngine<Option<WeekPage>> {
        with_tx!(self, |db_tx| {
            match Self::next_oldest(&db_tx, before, filter).await? {
                Some(anchor) => {
                    let window = WeekWindow::ending_at(anchor.date)?;
                    let operations = Self::operations_in_window(&db_tx, window, filter).await?;
                    Ok(Some(WeekPage { window, operations }))
                }
                None => Ok(None),
            }
        })
    }

    async fn operations_in_window(
        db_tx: &DatabaseTransaction,
        window: WeekWindow,
        filter: &OperationFilter,
    ) -> ResultEngine<Vec<Operation>> {
        let scope = Condition::all()
            .add(operations::Column::Date.gte(window.start))
            .add(operations::Column::Date.lte(window.end));
        let query = filtered(db_tx, scope, filter).await?;
        let models = newest_first(query).all(db_tx).await?;
        into_operations(models)
    }

    async fn next_oldest(
        db_tx: &DatabaseTransaction,
        before: NaiveDate,
        filter: &OperationFilter,
    ) -> ResultEngine<Option<Operation>> {
        let scope = Condition::all().add(operations::Column::Date.lt(before));
        let query = filtered(db_tx, scope, filter).await?;
        newest_first(query)
            .one(db_tx)
            .await?
            .map(Operation::try_from)
            .transpose()
    }
}
