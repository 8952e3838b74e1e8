#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{Currency, Engine, MissingAccountPolicy};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_policy(MissingAccountPolicy::Lenient).await
}

pub async fn engine_with_policy(policy: MissingAccountPolicy) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .missing_account_policy(policy)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn currency(code: &str) -> Currency {
    Currency::try_from(code).unwrap()
}

pub async fn balance(engine: &Engine, account_id: i64) -> String {
    engine.account(account_id).await.unwrap().balance
}
