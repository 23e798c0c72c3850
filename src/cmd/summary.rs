//! Summary command - tax year totals, archived per generation

use crate::cmd::schema::CsvColumn;
use crate::cmd::{format_money, format_money_signed};
use crate::core::{OwnerId, SummaryId, TaxYear, TaxYearSummary};
use crate::journal::Journal;
use crate::report::{LogPublisher, SummaryEngine, SummaryStore};
use crate::summaries::SummaryArchive;
use clap::{Args, Subcommand};
use ledgerc_derive::CsvSchema;
use serde::Serialize;
use std::collections::BTreeMap;
use std::{io, path::PathBuf};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Subcommand, Debug)]
pub enum SummaryCommand {
    /// Generate and archive the summary for an owner and tax year
    Generate(GenerateSummary),
    /// Show an archived summary by id
    Show(ShowSummary),
    /// List archived summaries
    List(ListSummaries),
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self {
            SummaryCommand::Generate(cmd) => cmd.exec(),
            SummaryCommand::Show(cmd) => cmd.exec(),
            SummaryCommand::List(cmd) => cmd.exec(),
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateSummary {
    /// Journal file holding the income and expense records
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Archive file the summary is saved to
    #[arg(short, long, default_value = "summaries.json")]
    summaries: PathBuf,

    /// Owner to summarise
    #[arg(short, long)]
    owner: String,

    /// Tax year start year (e.g. 2023 for 2023/24)
    #[arg(short, long)]
    year: i32,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl GenerateSummary {
    pub fn exec(&self) -> anyhow::Result<()> {
        let owner = OwnerId::new(&self.owner)?;
        let tax_year = TaxYear::of(self.year)?;
        let journal = Journal::load(&self.journal)?;
        let archive = SummaryArchive::new(&self.summaries);
        let engine = SummaryEngine::new(&journal, &journal, &archive, &LogPublisher);

        let summary = engine.generate(&owner, tax_year)?;

        if self.json {
            let data = SummaryData::from_summary(&summary)?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            print_summary(&summary)?;
            println!("Generated summary {}", summary.id());
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowSummary {
    /// Archive file to read
    #[arg(short, long, default_value = "summaries.json")]
    summaries: PathBuf,

    /// Id of the summary to show
    #[arg(short, long)]
    id: SummaryId,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl ShowSummary {
    pub fn exec(&self) -> anyhow::Result<()> {
        let archive = SummaryArchive::new(&self.summaries);
        let Some(summary) = archive.find_by_id(self.id)? else {
            println!("Summary {} not found", self.id);
            return Ok(());
        };

        if self.json {
            let data = SummaryData::from_summary(&summary)?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            print_summary(&summary)?;
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListSummaries {
    /// Archive file to read
    #[arg(short, long, default_value = "summaries.json")]
    summaries: PathBuf,

    /// Filter by owner
    #[arg(short, long)]
    owner: Option<String>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl ListSummaries {
    pub fn exec(&self) -> anyhow::Result<()> {
        let archive = SummaryArchive::new(&self.summaries);
        let owner = match &self.owner {
            Some(owner) => Some(OwnerId::new(owner)?),
            None => None,
        };
        let rows = build_summary_rows(&archive.summaries()?, owner.as_ref())?;

        if self.csv {
            write_csv(&rows)
        } else {
            print_table(&rows);
            Ok(())
        }
    }
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData {
    id: String,
    owner: String,
    tax_year: String,
    period_start: String,
    period_end: String,
    currency: String,
    total_income: String,
    total_expenses: String,
    profit: String,
    expenses_by_category: BTreeMap<String, String>,
}

impl SummaryData {
    fn from_summary(summary: &TaxYearSummary) -> anyhow::Result<SummaryData> {
        let profit = summary.profit()?;
        let expenses_by_category = summary
            .category_totals()
            .iter()
            .map(|(category, amount)| {
                (
                    category.name().to_string(),
                    format!("{:.2}", amount.amount()),
                )
            })
            .collect();

        Ok(SummaryData {
            id: summary.id().to_string(),
            owner: summary.owner().to_string(),
            tax_year: summary.tax_year().to_string(),
            period_start: summary.tax_year().start_date().to_string(),
            period_end: summary.tax_year().end_date().to_string(),
            currency: summary.total_income().currency().to_string(),
            total_income: format!("{:.2}", summary.total_income().amount()),
            total_expenses: format!("{:.2}", summary.total_expenses().amount()),
            profit: format!("{:.2}", profit.amount()),
            expenses_by_category,
        })
    }
}

fn print_summary(summary: &TaxYearSummary) -> anyhow::Result<()> {
    let profit = summary.profit()?;

    println!();
    println!(
        "TAX YEAR SUMMARY {} ({})",
        summary.tax_year(),
        summary.owner()
    );
    println!(
        "  {} to {}",
        summary.tax_year().start_date(),
        summary.tax_year().end_date()
    );
    println!();
    println!("  Income:   {}", format_money(summary.total_income()));
    println!("  Expenses: {}", format_money(summary.total_expenses()));
    println!("  Profit:   {}", format_money_signed(&profit));
    println!();

    if !summary.category_totals().is_empty() {
        println!("EXPENSES BY CATEGORY");
        for (category, amount) in summary.category_totals().iter() {
            println!("  {:22} {}", category.name(), format_money(amount));
        }
        println!();
    }
    Ok(())
}

fn build_summary_rows(
    summaries: &[TaxYearSummary],
    owner: Option<&OwnerId>,
) -> anyhow::Result<Vec<SummaryRow>> {
    let mut rows = Vec::new();
    for summary in summaries
        .iter()
        .filter(|s| owner.is_none_or(|o| s.owner() == o))
    {
        rows.push(SummaryRow {
            id: summary.id().to_string(),
            owner: summary.owner().to_string(),
            tax_year: summary.tax_year().to_string(),
            income: format_money(summary.total_income()),
            expenses: format_money(summary.total_expenses()),
            profit: format_money_signed(&summary.profit()?),
        });
    }
    Ok(rows)
}

fn print_table(rows: &[SummaryRow]) {
    if rows.is_empty() {
        println!("No summaries found");
        return;
    }

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn write_csv(rows: &[SummaryRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Row for the summaries table output
#[derive(Debug, Clone, Tabled, serde::Serialize, CsvSchema)]
pub struct SummaryRow {
    /// Summary id
    #[tabled(rename = "Id")]
    pub id: String,

    /// Owner the summary covers
    #[tabled(rename = "Owner")]
    pub owner: String,

    /// Tax year, e.g. 2023/24
    #[tabled(rename = "Tax Year")]
    pub tax_year: String,

    /// Total income for the year
    #[tabled(rename = "Income")]
    pub income: String,

    /// Total expenses for the year
    #[tabled(rename = "Expenses")]
    pub expenses: String,

    /// Income minus expenses, may be negative
    #[tabled(rename = "Profit")]
    pub profit: String,
}
