use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use engine::{
    AmountRange, CategoryKind, Currency, DateRange, MissingAccountPolicy, Money, OperationFilter,
    OperationKind,
};

#[derive(Parser, Debug)]
#[command(name = "libretto")]
#[command(about = "Personal ledger: accounts, operations and weekly listings")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override the database (`memory` or a sqlite file path).
    #[arg(long)]
    pub database: Option<String>,
    /// Override the log level (e.g. `info`, `debug`).
    #[arg(long)]
    pub log_level: Option<String>,
    /// Override how balance writes treat missing accounts.
    #[arg(long, value_parser = parse_policy)]
    pub missing_account_policy: Option<MissingAccountPolicy>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Account(Account),
    Category(Category),
    Op(Op),
    /// List one week of operations.
    Week(WeekArgs),
    /// Months that contain operations, newest first.
    Months,
    /// Expenses per category over a period.
    Spending(ReportArgs),
    /// Incomes per category over a period.
    Income(ReportArgs),
}

#[derive(Args, Debug)]
pub struct Account {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    Add(AccountAddArgs),
    List,
}

#[derive(Args, Debug)]
pub struct AccountAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, value_parser = parse_currency)]
    pub currency: Currency,
    /// Opening balance.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub balance: String,
}

#[derive(Args, Debug)]
pub struct Category {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    Add(CategoryAddArgs),
    List,
}

#[derive(Args, Debug)]
pub struct CategoryAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "type", value_parser = parse_category_kind)]
    pub kind: CategoryKind,
    #[arg(long)]
    pub parent: Option<i64>,
    /// Create a folder that only groups other categories.
    #[arg(long)]
    pub folder: bool,
}

#[derive(Args, Debug)]
pub struct Op {
    #[command(subcommand)]
    pub command: OpCommand,
}

#[derive(Subcommand, Debug)]
pub enum OpCommand {
    Add(OpAddArgs),
    Update(OpUpdateArgs),
    Delete { id: i64 },
    Show { id: i64 },
}

#[derive(Args, Debug)]
pub struct OpAddArgs {
    #[arg(long = "type", value_parser = parse_operation_kind)]
    pub kind: OperationKind,
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub account: i64,
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub to_account: Option<i64>,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub destination_amount: Option<String>,
    #[arg(long)]
    pub exchange_rate: Option<String>,
    #[arg(long, value_parser = parse_currency)]
    pub source_currency: Option<Currency>,
    #[arg(long, value_parser = parse_currency)]
    pub destination_currency: Option<Currency>,
}

#[derive(Args, Debug)]
pub struct OpUpdateArgs {
    pub id: i64,
    #[arg(long = "type", value_parser = parse_operation_kind)]
    pub kind: Option<OperationKind>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub account: Option<i64>,
    #[arg(long, conflicts_with = "clear_category")]
    pub category: Option<i64>,
    #[arg(long)]
    pub clear_category: bool,
    #[arg(long, conflicts_with = "clear_to_account")]
    pub to_account: Option<i64>,
    #[arg(long)]
    pub clear_to_account: bool,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long, conflicts_with = "clear_conversion")]
    pub destination_amount: Option<String>,
    #[arg(long, conflicts_with = "clear_conversion")]
    pub exchange_rate: Option<String>,
    /// Drop destination amount, rate and currencies.
    #[arg(long)]
    pub clear_conversion: bool,
}

#[derive(Args, Debug)]
pub struct WeekArgs {
    /// Weeks back from today (0 = the last seven days).
    #[arg(long, default_value_t = 0, conflicts_with_all = ["ending", "before"])]
    pub offset: u32,
    /// List the week ending on this date.
    #[arg(long, conflicts_with = "before")]
    pub ending: Option<NaiveDate>,
    /// List the week of the newest matching operation before this date.
    #[arg(long)]
    pub before: Option<NaiveDate>,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long = "type", value_parser = parse_operation_kind)]
    pub types: Vec<OperationKind>,
    #[arg(long = "account")]
    pub accounts: Vec<i64>,
    #[arg(long = "category")]
    pub categories: Vec<i64>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
    #[arg(long, value_parser = parse_money)]
    pub min: Option<Money>,
    #[arg(long, value_parser = parse_money)]
    pub max: Option<Money>,
}

impl From<FilterArgs> for OperationFilter {
    fn from(args: FilterArgs) -> Self {
        let date_range = match (args.from, args.to) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        };
        let amount_range = (args.min.is_some() || args.max.is_some()).then_some(AmountRange {
            min: args.min,
            max: args.max,
        });
        Self {
            types: args.types.into_iter().collect(),
            account_ids: args.accounts.into_iter().collect(),
            category_ids: args.categories.into_iter().collect(),
            search_text: args.search,
            date_range,
            amount_range,
        }
    }
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long, value_parser = parse_currency)]
    pub currency: Currency,
    #[arg(long)]
    pub from: NaiveDate,
    #[arg(long)]
    pub to: NaiveDate,
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    Currency::try_from(raw).map_err(|err| err.to_string())
}

fn parse_operation_kind(raw: &str) -> Result<OperationKind, String> {
    OperationKind::try_from(raw).map_err(|err| err.to_string())
}

fn parse_category_kind(raw: &str) -> Result<CategoryKind, String> {
    CategoryKind::try_from(raw).map_err(|err| err.to_string())
}

fn parse_money(raw: &str) -> Result<Money, String> {
    raw.parse().map_err(|err: engine::EngineError| err.to_string())
}

pub(crate) fn parse_policy(raw: &str) -> Result<MissingAccountPolicy, String> {
    match raw {
        "lenient" => Ok(MissingAccountPolicy::Lenient),
        "strict" => Ok(MissingAccountPolicy::Strict),
        other => Err(format!("unknown missing account policy: {other}")),
    }
}
