use std::io::Write;

use chrono::Local;
use serde::Serialize;

use engine::{Engine, OperationFilter, OperationInput, OperationPatch};

use crate::{
    cli::{
        AccountCommand, CategoryCommand, Command, OpAddArgs, OpCommand, OpUpdateArgs, ReportArgs,
        WeekArgs,
    },
    error::Result,
};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

pub async fn run(engine: &Engine, command: Command) -> Result<()> {
    match command {
        Command::Account(account) => match account.command {
            AccountCommand::Add(args) => {
                let id = engine
                    .new_account(&args.name, args.currency, &args.balance)
                    .await?;
                print_json(&engine.account(id).await?)
            }
            AccountCommand::List => print_json(&engine.accounts().await?),
        },
        Command::Category(category) => match category.command {
            CategoryCommand::Add(args) => {
                let id = engine
                    .new_category(&args.name, args.kind, args.parent, args.folder)
                    .await?;
                print_json(&engine.category(id).await?)
            }
            CategoryCommand::List => print_json(&engine.categories().await?),
        },
        Command::Op(op) => match op.command {
            OpCommand::Add(args) => {
                let input = operation_input(args);
                engine.validate_operation(&input).await?;
                print_json(&engine.create_operation(input).await?)
            }
            OpCommand::Update(args) => {
                let id = args.id;
                let patch = operation_patch(args);
                print_json(&engine.update_operation(id, patch).await?)
            }
            OpCommand::Delete { id } => print_json(&engine.delete_operation(id).await?),
            OpCommand::Show { id } => print_json(&engine.operation(id).await?),
        },
        Command::Week(args) => week(engine, args).await,
        Command::Months => print_json(&engine.available_months().await?),
        Command::Spending(ReportArgs { currency, from, to }) => print_json(
            &engine
                .spending_by_category_and_currency(&currency, from, to)
                .await?,
        ),
        Command::Income(ReportArgs { currency, from, to }) => print_json(
            &engine
                .income_by_category_and_currency(&currency, from, to)
                .await?,
        ),
    }
}

async fn week(engine: &Engine, args: WeekArgs) -> Result<()> {
    let filter = OperationFilter::from(args.filter);
    if let Some(before) = args.before {
        return print_json(&engine.older_week(before, &filter).await?);
    }
    let operations = match args.ending {
        Some(end) => {
            engine
                .filtered_operations_by_week_from_date(end, &filter)
                .await?
        }
        None => {
            let today = Local::now().date_naive();
            engine
                .filtered_operations_by_week_offset(today, args.offset, &filter)
                .await?
        }
    };
    print_json(&operations)
}

fn operation_input(args: OpAddArgs) -> OperationInput {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    OperationInput {
        kind: args.kind,
        amount: args.amount,
        account_id: args.account,
        category_id: args.category,
        to_account_id: args.to_account,
        date,
        description: args.description,
        exchange_rate: args.exchange_rate,
        destination_amount: args.destination_amount,
        source_currency: args.source_currency.map(String::from),
        destination_currency: args.destination_currency.map(String::from),
    }
}

/// `Some(None)` clears a nullable column, `Some(Some(_))` sets it.
fn nullable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear { Some(None) } else { value.map(Some) }
}

fn operation_patch(args: OpUpdateArgs) -> OperationPatch {
    let conversion_cleared = args.clear_conversion.then_some(None);
    OperationPatch {
        kind: args.kind,
        amount: args.amount,
        account_id: args.account,
        category_id: nullable(args.category, args.clear_category),
        to_account_id: nullable(args.to_account, args.clear_to_account),
        date: args.date,
        description: nullable(args.description, args.clear_description),
        exchange_rate: nullable(args.exchange_rate, args.clear_conversion),
        destination_amount: nullable(args.destination_amount, args.clear_conversion),
        source_currency: conversion_cleared.clone(),
        destination_currency: conversion_cleared,
    }
}
