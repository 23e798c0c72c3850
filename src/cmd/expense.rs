//! Expense command - record and amend business expenses

use crate::cmd::format_money;
use crate::cmd::schema::CsvColumn;
use crate::core::{Expense, ExpenseCategory, ExpenseId, Money, OwnerId};
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
pub enum ExpenseCommand {
    /// Record a new expense
    Add(AddExpense),
    /// Amend an existing expense
    Update(UpdateExpense),
    /// Show a single expense
    Show(ShowExpense),
    /// List expenses, oldest first
    List(ListExpenses),
}

impl ExpenseCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self {
            ExpenseCommand::Add(cmd) => cmd.exec(),
            ExpenseCommand::Update(cmd) => cmd.exec(),
            ExpenseCommand::Show(cmd) => cmd.exec(),
            ExpenseCommand::List(cmd) => cmd.exec(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Travel,
    Equipment,
    OfficeSupplies,
    Software,
    Marketing,
    ProfessionalServices,
    Other,
}

impl From<CategoryArg> for ExpenseCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Travel => ExpenseCategory::Travel,
            CategoryArg::Equipment => ExpenseCategory::Equipment,
            CategoryArg::OfficeSupplies => ExpenseCategory::OfficeSupplies,
            CategoryArg::Software => ExpenseCategory::Software,
            CategoryArg::Marketing => ExpenseCategory::Marketing,
            CategoryArg::ProfessionalServices => ExpenseCategory::ProfessionalServices,
            CategoryArg::Other => ExpenseCategory::Other,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddExpense {
    /// Journal file to record into
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Owner the expense belongs to
    #[arg(short, long)]
    owner: String,

    /// Expense amount
    #[arg(short, long)]
    amount: Decimal,

    /// Expense currency
    #[arg(short, long, default_value = "GBP")]
    currency: String,

    /// Expense category
    #[arg(short = 't', long, value_enum)]
    category: CategoryArg,

    /// What the expense was for
    #[arg(long)]
    description: String,

    /// Date the expense was incurred (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,
}

impl AddExpense {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut journal = Journal::load(&self.journal)?;
        let owner = OwnerId::new(&self.owner)?;
        let amount = Money::new(self.amount, &self.currency)?;
        let expense = Expense::record(
            owner,
            amount,
            self.category.into(),
            &self.description,
            self.date,
        )?;
        let id = expense.id();
        journal.add_expense(expense)?;
        journal.save(&self.journal)?;
        println!("Recorded expense {}", id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdateExpense {
    /// Journal file containing the expense
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Id of the expense to amend
    #[arg(short, long)]
    id: ExpenseId,

    /// New amount
    #[arg(short, long)]
    amount: Decimal,

    /// New currency
    #[arg(short, long, default_value = "GBP")]
    currency: String,

    /// New category
    #[arg(short = 't', long, value_enum)]
    category: CategoryArg,

    /// New description
    #[arg(long)]
    description: String,

    /// New incurred date (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,
}

impl UpdateExpense {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut journal = Journal::load(&self.journal)?;
        let amount = Money::new(self.amount, &self.currency)?;
        journal.find_expense_mut(self.id)?.update(
            amount,
            self.category.into(),
            &self.description,
            self.date,
        )?;
        journal.save(&self.journal)?;
        println!("Updated expense {}", self.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowExpense {
    /// Journal file containing the expense
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Id of the expense to show
    #[arg(short, long)]
    id: ExpenseId,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl ShowExpense {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = Journal::load(&self.journal)?;
        let expense = journal.find_expense(self.id)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(expense)?);
        } else {
            println!("Expense {}", expense.id());
            println!("  Incurred:    {}", expense.incurred_date());
            println!("  Owner:       {}", expense.owner());
            println!("  Category:    {}", expense.category());
            println!("  Description: {}", expense.description());
            println!("  Amount:      {}", format_money(expense.amount()));
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListExpenses {
    /// Journal file to list from
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Filter by owner
    #[arg(short, long)]
    owner: Option<String>,

    /// Filter by category
    #[arg(short = 't', long, value_enum)]
    category: Option<CategoryArg>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl ListExpenses {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = Journal::load(&self.journal)?;
        let owner = match &self.owner {
            Some(owner) => Some(OwnerId::new(owner)?),
            None => None,
        };
        let category = self.category.map(ExpenseCategory::from);
        let rows = build_expense_rows(journal.expenses(), owner.as_ref(), category);

        if self.csv {
            write_csv(&rows)
        } else {
            print_table(&rows);
            Ok(())
        }
    }
}

fn build_expense_rows(
    expenses: &[Expense],
    owner: Option<&OwnerId>,
    category: Option<ExpenseCategory>,
) -> Vec<ExpenseRow> {
    let mut expenses: Vec<&Expense> = expenses
        .iter()
        .filter(|e| owner.is_none_or(|o| e.owner() == o))
        .filter(|e| category.is_none_or(|c| e.category() == c))
        .collect();
    expenses.sort_by_key(|e| e.incurred_date());

    expenses
        .iter()
        .map(|expense| ExpenseRow {
            id: expense.id().to_string(),
            date: expense.incurred_date().to_string(),
            owner: expense.owner().to_string(),
            category: expense.category().to_string(),
            description: expense.description().to_string(),
            amount: format_money(expense.amount()),
        })
        .collect()
}

fn print_table(rows: &[ExpenseRow]) {
    if rows.is_empty() {
        println!("No expenses found");
        return;
    }

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn write_csv(rows: &[ExpenseRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Row for the expenses table output
#[derive(Debug, Clone, Tabled, serde::Serialize, CsvSchema)]
pub struct ExpenseRow {
    /// Expense id
    #[tabled(rename = "Id")]
    pub id: String,

    /// Date the expense was incurred (YYYY-MM-DD)
    #[tabled(rename = "Incurred")]
    pub date: String,

    /// Owner the expense belongs to
    #[tabled(rename = "Owner")]
    pub owner: String,

    /// Expense category
    #[tabled(rename = "Category")]
    pub category: String,

    /// What the expense was for
    #[tabled(rename = "Description")]
    pub description: String,

    /// Expense amount
    #[tabled(rename = "Amount")]
    pub amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn expense(category: ExpenseCategory, amount: Decimal, date: NaiveDate) -> Expense {
        Expense::record(
            OwnerId::new("alice").unwrap(),
            Money::gbp(amount).unwrap(),
            category,
            "Receipt",
            date,
        )
        .unwrap()
    }

    #[test]
    fn category_filter_keeps_matching_rows_only() {
        let expenses = vec![
            expense(ExpenseCategory::Travel, dec!(40.00), ymd(2023, 6, 1)),
            expense(ExpenseCategory::Software, dec!(9.99), ymd(2023, 6, 2)),
        ];
        let rows = build_expense_rows(&expenses, None, Some(ExpenseCategory::Software));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Software");
        assert_eq!(rows[0].amount, "\u{00A3}9.99");
    }

    #[test]
    fn rows_are_sorted_by_incurred_date() {
        let expenses = vec![
            expense(ExpenseCategory::Travel, dec!(40.00), ymd(2023, 7, 1)),
            expense(ExpenseCategory::Travel, dec!(10.00), ymd(2023, 5, 1)),
        ];
        let rows = build_expense_rows(&expenses, None, None);
        assert_eq!(rows[0].date, "2023-05-01");
        assert_eq!(rows[1].date, "2023-07-01");
    }

    #[test]
    fn csv_columns_match_the_row_fields() {
        let names: Vec<_> = ExpenseRow::csv_columns().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["id", "date", "owner", "category", "description", "amount"]
        );
    }
}
