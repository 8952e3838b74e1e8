mod common;

use std::collections::{BTreeSet, HashSet};

use engine::{
    AmountRange, CategoryKind, DateRange, Engine, Money, Operation, OperationFilter,
    OperationInput, OperationKind, WeekWindow,
};

use common::{currency, date, engine_with_db};

struct Fixture {
    cash: i64,
    bank: i64,
    card: i64,
    food: i64,
    salary: i64,
}

fn ids(ops: &[Operation]) -> Vec<i64> {
    ops.iter().map(|op| op.id).collect()
}

/// Accounts, categories and operations spread over four weeks before
/// 2025-01-15 (a Wednesday).
async fn seed(engine: &Engine) -> Fixture {
    let cash = engine.new_account("Cash", currency("EUR"), "0").await.unwrap();
    let bank = engine.new_account("Main Bank", currency("EUR"), "0").await.unwrap();
    let card = engine.new_account("Travel card", currency("USD"), "0").await.unwrap();
    let food = engine
        .new_category("Groceries", CategoryKind::Expense, None, false)
        .await
        .unwrap();
    let salary = engine
        .new_category("Salary", CategoryKind::Income, None, false)
        .await
        .unwrap();

    let inputs = [
        OperationInput::expense(cash, food, "12.50", date(2025, 1, 15)).with_description("Bakery"),
        OperationInput::income(bank, salary, "2500", date(2025, 1, 9)),
        OperationInput::transfer(bank, cash, "100", date(2025, 1, 8)),
        OperationInput::expense(card, food, "42.00", date(2025, 1, 2))
            .with_description("Market 50% off"),
        OperationInput::transfer(bank, card, "200", date(2025, 1, 1))
            .with_conversion("210.40", Some("1.052"), "EUR", "USD"),
        OperationInput::expense(bank, food, "7.99", date(2024, 12, 1)),
    ];
    for input in inputs {
        engine.create_operation(input).await.unwrap();
    }

    Fixture {
        cash,
        bank,
        card,
        food,
        salary,
    }
}

#[tokio::test]
async fn week_offsets_select_their_window() {
    let (engine, _db) = engine_with_db().await;
    seed(&engine).await;
    let today = date(2025, 1, 15);

    let week0 = engine.operations_by_week_offset(today, 0).await.unwrap();
    let dates: Vec<_> = week0.iter().map(|op| op.date).collect();
    assert_eq!(dates, [date(2025, 1, 15), date(2025, 1, 9)]);

    let week1 = engine.operations_by_week_offset(today, 1).await.unwrap();
    let dates: Vec<_> = week1.iter().map(|op| op.date).collect();
    assert_eq!(dates, [date(2025, 1, 8), date(2025, 1, 2)]);

    let week2 = engine.operations_by_week_offset(today, 2).await.unwrap();
    let dates: Vec<_> = week2.iter().map(|op| op.date).collect();
    assert_eq!(dates, [date(2025, 1, 1)]);

    assert!(engine.operations_by_week_offset(today, 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn offsets_partition_every_operation() {
    let (engine, _db) = engine_with_db().await;
    seed(&engine).await;
    let today = date(2025, 1, 15);

    let mut seen = HashSet::new();
    for offset in 0..8 {
        let window = WeekWindow::for_offset(today, offset).unwrap();
        for op in engine.operations_by_week_offset(today, offset).await.unwrap() {
            assert!(window.contains(op.date));
            assert!(seen.insert(op.id), "operation {} listed twice", op.id);
        }
    }
    assert_eq!(seen.len(), 6);
}

#[tokio::test]
async fn same_day_operations_are_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let cash = engine.new_account("Cash", currency("EUR"), "0").await.unwrap();
    let food = engine
        .new_category("Food", CategoryKind::Expense, None, false)
        .await
        .unwrap();

    let mut created = Vec::new();
    for amount in ["1", "2", "3"] {
        let op = engine
            .create_operation(OperationInput::expense(cash, food, amount, date(2025, 1, 15)))
            .await
            .unwrap();
        created.push(op.id);
    }
    created.reverse();

    let listed = engine
        .operations_by_week_from_date(date(2025, 1, 15))
        .await
        .unwrap();
    assert_eq!(ids(&listed), created);
}

#[tokio::test]
async fn empty_filter_matches_unfiltered() {
    let (engine, _db) = engine_with_db().await;
    seed(&engine).await;
    let today = date(2025, 1, 15);
    let empty = OperationFilter::default();
    let blank = OperationFilter {
        types: OperationKind::ALL.into_iter().collect(),
        search_text: Some("  ".to_string()),
        amount_range: Some(AmountRange::default()),
        ..Default::default()
    };

    for offset in 0..4 {
        let plain = engine.operations_by_week_offset(today, offset).await.unwrap();
        for filter in [&empty, &blank] {
            let filtered = engine
                .filtered_operations_by_week_offset(today, offset, filter)
                .await
                .unwrap();
            assert_eq!(filtered, plain);
        }
    }

    let end = date(2025, 1, 2);
    assert_eq!(
        engine
            .filtered_operations_by_week_from_date(end, &empty)
            .await
            .unwrap(),
        engine.operations_by_week_from_date(end).await.unwrap()
    );
    assert_eq!(
        engine
            .next_oldest_filtered_operation(end, &blank)
            .await
            .unwrap(),
        engine.next_oldest_operation(end).await.unwrap()
    );
}

#[tokio::test]
async fn next_oldest_then_week_visits_everything_once() {
    let (engine, _db) = engine_with_db().await;
    seed(&engine).await;

    let mut seen = Vec::new();
    let mut before = date(2025, 1, 16);
    while let Some(anchor) = engine.next_oldest_operation(before).await.unwrap() {
        let week = engine.operations_by_week_from_date(anchor.date).await.unwrap();
        assert_eq!(week.first().map(|op| op.id), Some(anchor.id));
        seen.extend(ids(&week));
        before = WeekWindow::ending_at(anchor.date).unwrap().start;
    }

    let unique: BTreeSet<_> = seen.iter().copied().collect();
    assert_eq!(unique.len(), seen.len());
    assert_eq!(seen.len(), 6);
}

#[tokio::test]
async fn older_week_walks_filtered_pages() {
    let (engine, _db) = engine_with_db().await;
    let f = seed(&engine).await;
    let filter = OperationFilter {
        account_ids: BTreeSet::from([f.bank]),
        ..Default::default()
    };

    let mut windows = Vec::new();
    let mut seen = Vec::new();
    let mut before = date(2025, 1, 16);
    while let Some(page) = engine.older_week(before, &filter).await.unwrap() {
        assert!(!page.operations.is_empty());
        assert!(page.operations.iter().all(|op| page.window.contains(op.date)));
        before = page.window.start;
        windows.push(page.window);
        seen.extend(ids(&page.operations));
    }

    assert_eq!(
        windows,
        [
            WeekWindow::ending_at(date(2025, 1, 9)).unwrap(),
            WeekWindow::ending_at(date(2025, 1, 1)).unwrap(),
            WeekWindow::ending_at(date(2024, 12, 1)).unwrap(),
        ]
    );
    assert_eq!(seen.len(), 4);
    assert!(engine.older_week(date(2024, 12, 1), &filter).await.unwrap().is_none());
}

#[tokio::test]
async fn account_filter_matches_both_transfer_sides() {
    let (engine, _db) = engine_with_db().await;
    let f = seed(&engine).await;
    let filter = OperationFilter {
        account_ids: BTreeSet::from([f.card]),
        ..Default::default()
    };

    let ops = engine
        .filtered_operations_by_week_from_date(date(2025, 1, 7), &filter)
        .await
        .unwrap();
    let kinds: Vec<_> = ops.iter().map(|op| op.kind).collect();
    assert_eq!(kinds, [OperationKind::Expense, OperationKind::Transfer]);
    assert!(ops.iter().all(|op| op.account_id == f.card || op.to_account_id == Some(f.card)));
}

#[tokio::test]
async fn type_and_category_filters() {
    let (engine, _db) = engine_with_db().await;
    let f = seed(&engine).await;
    let today = date(2025, 1, 15);

    let transfers = OperationFilter {
        types: BTreeSet::from([OperationKind::Transfer]),
        ..Default::default()
    };
    let week1 = engine
        .filtered_operations_by_week_offset(today, 1, &transfers)
        .await
        .unwrap();
    assert_eq!(week1.len(), 1);
    assert_eq!(week1[0].to_account_id, Some(f.cash));

    let salary = OperationFilter {
        category_ids: BTreeSet::from([f.salary]),
        ..Default::default()
    };
    let week0 = engine
        .filtered_operations_by_week_offset(today, 0, &salary)
        .await
        .unwrap();
    assert_eq!(week0.len(), 1);
    assert_eq!(week0[0].kind, OperationKind::Income);

    let combined = OperationFilter {
        types: BTreeSet::from([OperationKind::Income]),
        category_ids: BTreeSet::from([f.food]),
        ..Default::default()
    };
    assert!(
        engine
            .filtered_operations_by_week_offset(today, 0, &combined)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn amount_and_date_ranges_are_inclusive() {
    let (engine, _db) = engine_with_db().await;
    seed(&engine).await;

    let amounts = OperationFilter {
        amount_range: Some(AmountRange {
            min: Some(Money::new(42_00)),
            max: Some(Money::new(200_00)),
        }),
        ..Default::default()
    };
    let mut found = Vec::new();
    let mut before = date(2025, 1, 16);
    while let Some(page) = engine.older_week(before, &amounts).await.unwrap() {
        before = page.window.start;
        found.extend(page.operations.into_iter().map(|op| op.amount));
    }
    assert_eq!(found, ["100.00", "42.00", "200.00"]);

    let only_min = OperationFilter {
        amount_range: Some(AmountRange {
            min: Some(Money::new(12_50)),
            max: None,
        }),
        ..Default::default()
    };
    let week0 = engine
        .filtered_operations_by_week_offset(date(2025, 1, 15), 0, &only_min)
        .await
        .unwrap();
    assert_eq!(week0.len(), 2);

    let days = OperationFilter {
        date_range: Some(DateRange {
            start: date(2025, 1, 9),
            end: date(2025, 1, 9),
        }),
        ..Default::default()
    };
    let week0 = engine
        .filtered_operations_by_week_offset(date(2025, 1, 15), 0, &days)
        .await
        .unwrap();
    assert_eq!(week0.len(), 1);
    assert_eq!(week0[0].date, date(2025, 1, 9));

    // both the window and the range must hold
    let outside = OperationFilter {
        date_range: Some(DateRange {
            start: date(2024, 1, 1),
            end: date(2025, 1, 5),
        }),
        ..Default::default()
    };
    assert!(
        engine
            .filtered_operations_by_week_offset(date(2025, 1, 15), 0, &outside)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn search_matches_text_amounts_and_names() {
    let (engine, _db) = engine_with_db().await;
    let f = seed(&engine).await;

    async fn search(engine: &Engine, text: &str) -> Vec<Operation> {
        let filter = OperationFilter {
            search_text: Some(text.to_string()),
            ..Default::default()
        };
        let mut out = Vec::new();
        let mut before = date(2025, 1, 16);
        while let Some(page) = engine.older_week(before, &filter).await.unwrap() {
            before = page.window.start;
            out.extend(page.operations);
        }
        out
    }

    let bakery = search(&engine, "  bAKERY ").await;
    assert_eq!(bakery.len(), 1);
    assert_eq!(bakery[0].description.as_deref(), Some("Bakery"));

    let by_amount = search(&engine, "7.99").await;
    assert_eq!(by_amount.len(), 1);
    assert_eq!(by_amount[0].amount, "7.99");

    // source and destination account names
    let travel = search(&engine, "travel").await;
    assert_eq!(travel.len(), 2);
    assert!(travel.iter().all(|op| op.account_id == f.card || op.to_account_id == Some(f.card)));

    let category = search(&engine, "GROCER").await;
    assert_eq!(category.len(), 3);
    assert!(category.iter().all(|op| op.category_id == Some(f.food)));

    // wildcards are matched literally
    let percent = search(&engine, "50%").await;
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].description.as_deref(), Some("Market 50% off"));
    assert!(search(&engine, "_").await.is_empty());
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
    let (engine, _db) = engine_with_db().await;
    let wallet = engine.new_account("Porte-monnaie", currency("EUR"), "0").await.unwrap();
    let epicerie = engine
        .new_category("Épicerie", CategoryKind::Expense, None, false)
        .await
        .unwrap();
    let other = engine
        .new_category("Loyer", CategoryKind::Expense, None, false)
        .await
        .unwrap();
    let groceries = engine
        .create_operation(OperationInput::expense(wallet, epicerie, "18.20", date(2025, 7, 14)))
        .await
        .unwrap();
    let summer = engine
        .create_operation(
            OperationInput::expense(wallet, other, "640", date(2025, 7, 12))
                .with_description("ÉTÉ"),
        )
        .await
        .unwrap();

    let today = date(2025, 7, 15);
    for (text, expected) in [
        ("Épicerie", groceries.id),
        ("épicerie", groceries.id),
        ("ÉPICERIE", groceries.id),
        ("ÉTÉ", summer.id),
        ("été", summer.id),
    ] {
        let filter = OperationFilter {
            search_text: Some(text.to_string()),
            ..Default::default()
        };
        let found = engine
            .filtered_operations_by_week_offset(today, 0, &filter)
            .await
            .unwrap();
        assert_eq!(ids(&found), [expected], "search {text:?}");
    }

    let filter = OperationFilter {
        search_text: Some("été".to_string()),
        ..Default::default()
    };
    let older = engine
        .next_oldest_filtered_operation(date(2025, 7, 14), &filter)
        .await
        .unwrap();
    assert_eq!(older.map(|op| op.id), Some(summer.id));
}
