//! Income command - record income and track its payment status

use crate::cmd::format_money;
use crate::cmd::schema::CsvColumn;
use crate::core::{EventId, Income, IncomeId, Money, OwnerId, PaymentStatus, StatusChange};
use crate::journal::Journal;
use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use ledgerc_derive::CsvSchema;
use rust_decimal::Decimal;
use std::{io, path::PathBuf};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Subcommand, Debug)]
pub enum IncomeCommand {
    /// Record new income against an event
    Add(AddIncome),
    /// Amend amount, description or received date
    Update(UpdateIncome),
    /// Mark an income record as paid
    MarkPaid(StatusArgs),
    /// Mark an income record as overdue
    MarkOverdue(StatusArgs),
    /// Cancel an income record
    Cancel(StatusArgs),
    /// Show a single income record
    Show(ShowIncome),
    /// List income records, oldest first
    List(ListIncomes),
}

impl IncomeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self {
            IncomeCommand::Add(cmd) => cmd.exec(),
            IncomeCommand::Update(cmd) => cmd.exec(),
            IncomeCommand::MarkPaid(cmd) => cmd.exec(StatusChange::MarkPaid),
            IncomeCommand::MarkOverdue(cmd) => cmd.exec(StatusChange::MarkOverdue),
            IncomeCommand::Cancel(cmd) => cmd.exec(StatusChange::Cancel),
            IncomeCommand::Show(cmd) => cmd.exec(),
            IncomeCommand::List(cmd) => cmd.exec(),
        }
    }
}

#[derive(Args, Debug)]
pub struct AddIncome {
    /// Journal file to record into
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Owner the income belongs to
    #[arg(short, long)]
    owner: String,

    /// Id of the event the income relates to
    #[arg(short, long)]
    event: EventId,

    /// Payment amount
    #[arg(short, long)]
    amount: Decimal,

    /// Payment currency
    #[arg(short, long, default_value = "GBP")]
    currency: String,

    /// What the payment covers
    #[arg(long)]
    description: String,

    /// Date received or due (YYYY-MM-DD)
    #[arg(short, long)]
    received: NaiveDate,
}

impl AddIncome {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut journal = Journal::load(&self.journal)?;
        let owner = OwnerId::new(&self.owner)?;
        let amount = Money::new(self.amount, &self.currency)?;
        let income = Income::record(owner, self.event, amount, &self.description, self.received)?;
        let id = income.id();
        journal.add_income(income)?;
        journal.save(&self.journal)?;
        println!("Recorded income {}", id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdateIncome {
    /// Journal file containing the record
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Id of the income record to amend
    #[arg(short, long)]
    id: IncomeId,

    /// New amount
    #[arg(short, long)]
    amount: Decimal,

    /// New currency
    #[arg(short, long, default_value = "GBP")]
    currency: String,

    /// New description
    #[arg(long)]
    description: String,

    /// New received date (YYYY-MM-DD)
    #[arg(short, long)]
    received: NaiveDate,
}

impl UpdateIncome {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut journal = Journal::load(&self.journal)?;
        let amount = Money::new(self.amount, &self.currency)?;
        journal
            .find_income_mut(self.id)?
            .update(amount, &self.description, self.received)?;
        journal.save(&self.journal)?;
        println!("Updated income {}", self.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Journal file containing the record
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Id of the income record
    #[arg(short, long)]
    id: IncomeId,
}

impl StatusArgs {
    pub fn exec(&self, change: StatusChange) -> anyhow::Result<()> {
        let mut journal = Journal::load(&self.journal)?;
        let income = journal.find_income_mut(self.id)?;
        match change {
            StatusChange::MarkPaid => income.mark_paid(),
            StatusChange::MarkOverdue => income.mark_overdue(),
            StatusChange::Cancel => income.cancel(),
        }
        let status = income.status();
        journal.save(&self.journal)?;
        println!("Income {} is now {}", self.id, status);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowIncome {
    /// Journal file containing the record
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Id of the income record to show
    #[arg(short, long)]
    id: IncomeId,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl ShowIncome {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = Journal::load(&self.journal)?;
        let income = journal.find_income(self.id)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(income)?);
        } else {
            println!("Income {}", income.id());
            println!("  Received:    {}", income.received_date());
            println!("  Owner:       {}", income.owner());
            println!("  Event:       {}", income.event());
            println!("  Description: {}", income.description());
            println!("  Amount:      {}", format_money(income.amount()));
            println!("  Status:      {}", income.status());
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListIncomes {
    /// Journal file to list from
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Filter by owner
    #[arg(short, long)]
    owner: Option<String>,

    /// Filter by payment status
    #[arg(short, long, value_enum)]
    status: Option<StatusFilter>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusFilter {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl From<StatusFilter> for PaymentStatus {
    fn from(arg: StatusFilter) -> Self {
        match arg {
            StatusFilter::Pending => PaymentStatus::Pending,
            StatusFilter::Paid => PaymentStatus::Paid,
            StatusFilter::Overdue => PaymentStatus::Overdue,
            StatusFilter::Cancelled => PaymentStatus::Cancelled,
        }
    }
}

impl ListIncomes {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = Journal::load(&self.journal)?;
        let owner = match &self.owner {
            Some(owner) => Some(OwnerId::new(owner)?),
            None => None,
        };
        let status = self.status.map(PaymentStatus::from);
        let rows = build_income_rows(journal.incomes(), owner.as_ref(), status);

        if self.csv {
            write_csv(&rows)
        } else {
            print_table(&rows);
            Ok(())
        }
    }
}

fn build_income_rows(
    incomes: &[Income],
    owner: Option<&OwnerId>,
    status: Option<PaymentStatus>,
) -> Vec<IncomeRow> {
    let mut incomes: Vec<&Income> = incomes
        .iter()
        .filter(|i| owner.is_none_or(|o| i.owner() == o))
        .filter(|i| status.is_none_or(|s| i.status() == s))
        .collect();
    incomes.sort_by_key(|i| i.received_date());

    incomes
        .iter()
        .map(|income| IncomeRow {
            id: income.id().to_string(),
            received: income.received_date().to_string(),
            owner: income.owner().to_string(),
            event: income.event().to_string(),
            description: income.description().to_string(),
            amount: format_money(income.amount()),
            status: income.status().to_string(),
        })
        .collect()
}

fn print_table(rows: &[IncomeRow]) {
    if rows.is_empty() {
        println!("No income found");
        return;
    }

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn write_csv(rows: &[IncomeRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Row for the income table output
#[derive(Debug, Clone, Tabled, serde::Serialize, CsvSchema)]
pub struct IncomeRow {
    /// Income record id
    #[tabled(rename = "Id")]
    pub id: String,

    /// Date received or due (YYYY-MM-DD)
    #[tabled(rename = "Received")]
    pub received: String,

    /// Owner the income belongs to
    #[tabled(rename = "Owner")]
    pub owner: String,

    /// Id of the related event
    #[tabled(rename = "Event")]
    pub event: String,

    /// What the payment covers
    #[tabled(rename = "Description")]
    pub description: String,

    /// Payment amount
    #[tabled(rename = "Amount")]
    pub amount: String,

    /// Payment status
    #[tabled(rename = "Status")]
    pub status: String,
}
