//! Event command - record and amend client events

use crate::cmd::schema::CsvColumn;
use crate::core::{Event, EventId};
use crate::journal::Journal;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use ledgerc_derive::CsvSchema;
use std::{io, path::PathBuf};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// Record a new client event
    Add(AddEvent),
    /// Amend an existing event
    Update(UpdateEvent),
    /// Show a single event
    Show(ShowEvent),
    /// List events, oldest first
    List(ListEvents),
}

impl EventCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self {
            EventCommand::Add(cmd) => cmd.exec(),
            EventCommand::Update(cmd) => cmd.exec(),
            EventCommand::Show(cmd) => cmd.exec(),
            EventCommand::List(cmd) => cmd.exec(),
        }
    }
}

#[derive(Args, Debug)]
pub struct AddEvent {
    /// Journal file to record into
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Date the work happened (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,

    /// Client the work was done for
    #[arg(short, long)]
    client: String,

    /// What the event covers
    #[arg(long)]
    description: String,
}

impl AddEvent {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut journal = Journal::load(&self.journal)?;
        let event = Event::record(self.date, &self.client, &self.description)?;
        let id = event.id();
        journal.add_event(event)?;
        journal.save(&self.journal)?;
        println!("Recorded event {}", id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdateEvent {
    /// Journal file containing the event
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Id of the event to amend
    #[arg(short, long)]
    id: EventId,

    /// New date (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,

    /// New client name
    #[arg(short, long)]
    client: String,

    /// New description
    #[arg(long)]
    description: String,
}

impl UpdateEvent {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut journal = Journal::load(&self.journal)?;
        journal
            .find_event_mut(self.id)?
            .update(self.date, &self.client, &self.description)?;
        journal.save(&self.journal)?;
        println!("Updated event {}", self.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowEvent {
    /// Journal file containing the event
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Id of the event to show
    #[arg(short, long)]
    id: EventId,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl ShowEvent {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = Journal::load(&self.journal)?;
        let event = journal.find_event(self.id)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(event)?);
        } else {
            println!("Event {}", event.id());
            println!("  Date:        {}", event.date());
            println!("  Client:      {}", event.client());
            println!("  Description: {}", event.description());
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListEvents {
    /// Journal file to list from
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Filter by client name
    #[arg(short, long)]
    client: Option<String>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl ListEvents {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = Journal::load(&self.journal)?;
        let rows = build_event_rows(journal.events(), self.client.as_deref());

        if self.csv {
            write_csv(&rows)
        } else {
            print_table(&rows);
            Ok(())
        }
    }
}

fn build_event_rows(events: &[Event], client: Option<&str>) -> Vec<EventRow> {
    let mut events: Vec<&Event> = events
        .iter()
        .filter(|e| client.is_none_or(|c| e.client().as_str().eq_ignore_ascii_case(c)))
        .collect();
    events.sort_by_key(|e| e.date());

    events
        .iter()
        .map(|event| EventRow {
            id: event.id().to_string(),
            date: event.date().to_string(),
            client: event.client().to_string(),
            description: event.description().to_string(),
        })
        .collect()
}

fn print_table(rows: &[EventRow]) {
    if rows.is_empty() {
        println!("No events found");
        return;
    }

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn write_csv(rows: &[EventRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Row for the events table output
#[derive(Debug, Clone, Tabled, serde::Serialize, CsvSchema)]
pub struct EventRow {
    /// Event id
    #[tabled(rename = "Id")]
    pub id: String,

    /// Date the work happened (YYYY-MM-DD)
    #[tabled(rename = "Date")]
    pub date: String,

    /// Client the work was done for
    #[tabled(rename = "Client")]
    pub client: String,

    /// What the event covers
    #[tabled(rename = "Description")]
    pub description: String,
}
