mod common;

use engine::{CategoryKind, CategoryTotal, EngineError, MonthKey, OperationInput};

use common::{currency, date, engine_with_db};

fn total(category_id: i64, total: &str) -> CategoryTotal {
    CategoryTotal {
        category_id: Some(category_id),
        total: total.to_string(),
    }
}

#[tokio::test]
async fn spending_and_income_are_grouped_per_category_and_currency() {
    let (engine, _db) = engine_with_db().await;
    let eur = engine.new_account("Cash", currency("EUR"), "0").await.unwrap();
    let eur_bank = engine.new_account("Bank", currency("EUR"), "0").await.unwrap();
    let usd = engine.new_account("Card", currency("USD"), "0").await.unwrap();
    let food = engine
        .new_category("Food", CategoryKind::Expense, None, false)
        .await
        .unwrap();
    let rent = engine
        .new_category("Rent", CategoryKind::Expense, None, false)
        .await
        .unwrap();
    let salary = engine
        .new_category("Salary", CategoryKind::Income, None, false)
        .await
        .unwrap();

    let inputs = [
        OperationInput::expense(eur, food, "10.10", date(2025, 1, 3)),
        OperationInput::expense(eur_bank, food, "0.20", date(2025, 1, 31)),
        OperationInput::expense(eur_bank, rent, "900", date(2025, 1, 1)),
        // other currency
        OperationInput::expense(usd, food, "55", date(2025, 1, 10)),
        // outside the period
        OperationInput::expense(eur, rent, "900", date(2025, 2, 1)),
        OperationInput::income(eur_bank, salary, "2500", date(2025, 1, 25)),
        OperationInput::transfer(eur_bank, eur, "50", date(2025, 1, 5)),
    ];
    for input in inputs {
        engine.create_operation(input).await.unwrap();
    }

    let eur_code = currency("EUR");
    let spending = engine
        .spending_by_category_and_currency(&eur_code, date(2025, 1, 1), date(2025, 1, 31))
        .await
        .unwrap();
    assert_eq!(spending, [total(rent, "900.00"), total(food, "10.30")]);

    let income = engine
        .income_by_category_and_currency(&eur_code, date(2025, 1, 1), date(2025, 1, 31))
        .await
        .unwrap();
    assert_eq!(income, [total(salary, "2500.00")]);

    let usd_spending = engine
        .spending_by_category_and_currency(&currency("USD"), date(2025, 1, 1), date(2025, 12, 31))
        .await
        .unwrap();
    assert_eq!(usd_spending, [total(food, "55.00")]);

    assert!(
        engine
            .income_by_category_and_currency(&currency("USD"), date(2025, 1, 1), date(2025, 1, 31))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn equal_totals_are_ordered_by_category() {
    let (engine, _db) = engine_with_db().await;
    let acc = engine.new_account("Cash", currency("EUR"), "0").await.unwrap();
    let mut categories = Vec::new();
    for name in ["B", "A"] {
        categories.push(
            engine
                .new_category(name, CategoryKind::Expense, None, false)
                .await
                .unwrap(),
        );
    }
    for &category in categories.iter().rev() {
        engine
            .create_operation(OperationInput::expense(acc, category, "5", date(2025, 3, 3)))
            .await
            .unwrap();
    }

    let spending = engine
        .spending_by_category_and_currency(&currency("EUR"), date(2025, 3, 1), date(2025, 3, 31))
        .await
        .unwrap();
    assert_eq!(
        spending,
        [total(categories[0], "5.00"), total(categories[1], "5.00")]
    );
}

#[tokio::test]
async fn inverted_period_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let result = engine
        .spending_by_category_and_currency(&currency("EUR"), date(2025, 2, 1), date(2025, 1, 1))
        .await;
    assert!(matches!(result, Err(EngineError::InvalidDate(_))));
}

#[tokio::test]
async fn available_months_are_newest_first() {
    let (engine, _db) = engine_with_db().await;
    assert!(engine.available_months().await.unwrap().is_empty());

    let acc = engine.new_account("Cash", currency("EUR"), "0").await.unwrap();
    let food = engine
        .new_category("Food", CategoryKind::Expense, None, false)
        .await
        .unwrap();
    for day in [
        date(2025, 1, 15),
        date(2024, 12, 31),
        date(2025, 1, 2),
        date(2024, 3, 1),
        date(2024, 12, 1),
    ] {
        engine
            .create_operation(OperationInput::expense(acc, food, "1", day))
            .await
            .unwrap();
    }

    assert_eq!(
        engine.available_months().await.unwrap(),
        [
            MonthKey { year: 2025, month: 0 },
            MonthKey { year: 2024, month: 11 },
            MonthKey { year: 2024, month: 2 },
        ]
    );
}
