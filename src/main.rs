use clap::{Parser, Subcommand};

mod cmd;
mod core;
mod journal;
mod report;
mod summaries;

use cmd::event::EventCommand;
use cmd::expense::ExpenseCommand;
use cmd::income::IncomeCommand;
use cmd::schema::SchemaCommand;
use cmd::summary::SummaryCommand;
use cmd::validate::ValidateCommand;

/// Income and expense ledger for freelancers, with UK tax year summaries
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record and inspect client events
    #[command(subcommand)]
    Event(EventCommand),
    /// Record income and track payment status
    #[command(subcommand)]
    Income(IncomeCommand),
    /// Record business expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),
    /// Generate and inspect tax year summaries
    #[command(subcommand)]
    Summary(SummaryCommand),
    /// Check the journal for data issues
    Validate(ValidateCommand),
    /// Print file formats and CSV export layouts
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Event(cmd) => cmd.exec(),
        Command::Income(cmd) => cmd.exec(),
        Command::Expense(cmd) => cmd.exec(),
        Command::Summary(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
