//! Ledger schema: accounts, categories and operations.
//!
//! - `accounts`: running balances, stored as two-decimal strings
//! - `categories`: classification rows (folders group other categories)
//! - `operations`: expenses, incomes and transfers
//!
//! `operations` carries no foreign keys towards `accounts`: an operation may
//! outlive the account it references and the engine decides how to treat the
//! gap when balances are adjusted.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Name,
    Currency,
    Balance,
    UpdatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    #[iden = "type"]
    Kind,
    ParentId,
    IsFolder,
}

#[derive(Iden)]
enum Operations {
    Table,
    Id,
    #[iden = "type"]
    Kind,
    Amount,
    AccountId,
    CategoryId,
    ToAccountId,
    Date,
    CreatedAt,
    Description,
    ExchangeRate,
    DestinationAmount,
    SourceCurrency,
    DestinationCurrency,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Currency).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Balance)
                            .string()
                            .not_null()
                            .default("0.00"),
                    )
                    .col(ColumnDef::new(Accounts::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Kind).string().not_null())
                    .col(ColumnDef::new(Categories::ParentId).big_integer())
                    .col(
                        ColumnDef::new(Categories::IsFolder)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-parent_id")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Operations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Operations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Operations::Kind).string().not_null())
                    .col(ColumnDef::new(Operations::Amount).string().not_null())
                    .col(ColumnDef::new(Operations::AccountId).big_integer().not_null())
                    .col(ColumnDef::new(Operations::CategoryId).big_integer())
                    .col(ColumnDef::new(Operations::ToAccountId).big_integer())
                    .col(ColumnDef::new(Operations::Date).date().not_null())
                    .col(ColumnDef::new(Operations::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Operations::Description).string())
                    .col(ColumnDef::new(Operations::ExchangeRate).string())
                    .col(ColumnDef::new(Operations::DestinationAmount).string())
                    .col(ColumnDef::new(Operations::SourceCurrency).string())
                    .col(ColumnDef::new(Operations::DestinationCurrency).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-operations-date-created_at")
                    .table(Operations::Table)
                    .col(Operations::Date)
                    .col(Operations::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-operations-account_id")
                    .table(Operations::Table)
                    .col(Operations::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Operations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}
