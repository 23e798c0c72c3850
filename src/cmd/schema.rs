//! Schema command - print file formats and CSV export layouts

use crate::cmd::event::EventRow;
use crate::cmd::expense::ExpenseRow;
use crate::cmd::income::IncomeRow;
use crate::cmd::summary::SummaryRow;
use crate::journal::Journal;
use crate::summaries::ArchiveFile;
use clap::Args;
use schemars::schema_for;

/// One column of a CSV export, as recorded by the row struct derive.
#[derive(Debug, Clone, Copy)]
pub struct CsvColumn {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,

    /// Record type for the csv-* formats
    #[arg(short, long, value_enum, default_value = "income")]
    record: RecordKind,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the journal file
    JsonSchema,
    /// JSON Schema for the summary archive file
    SummariesSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RecordKind {
    Event,
    Income,
    Expense,
    Summary,
}

impl RecordKind {
    fn columns(self) -> &'static [CsvColumn] {
        match self {
            RecordKind::Event => EventRow::csv_columns(),
            RecordKind::Income => IncomeRow::csv_columns(),
            RecordKind::Expense => ExpenseRow::csv_columns(),
            RecordKind::Summary => SummaryRow::csv_columns(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            RecordKind::Event => "event",
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
            RecordKind::Summary => "summary",
        }
    }
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_journal_schema(),
            SchemaFormat::SummariesSchema => self.print_summaries_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_journal_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Journal);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_summaries_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(ArchiveFile);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        let names: Vec<&str> = self.record.columns().iter().map(|c| c.name).collect();
        println!("{}", names.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("CSV Export Format ({})", self.record.name());
        println!("================");
        println!();
        for column in self.record.columns() {
            let req = if column.required {
                "required"
            } else {
                "optional"
            };
            println!("{:20} ({:8})  {}", column.name, req, column.description);
        }
        println!();
        println!("Amounts are formatted for display; dates are YYYY-MM-DD");
        Ok(())
    }
}
