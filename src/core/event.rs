use chrono::{Months, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{non_blank, RecordError};

/// How far an event date may lie from today when recorded.
const YEARS_BACK: u32 = 10;
const YEARS_FORWARD: u32 = 5;

const MAX_CLIENT_NAME: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn generate() -> EventId {
        EventId(Uuid::new_v4())
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EventId(Uuid::parse_str(s)?))
    }
}

/// Client a piece of work was done for. Trimmed, non-blank, at most
/// 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "String", into = "String")]
pub struct ClientName(String);

impl ClientName {
    pub fn new(name: &str) -> Result<ClientName, RecordError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RecordError::BlankField("client name"));
        }
        if trimmed.chars().count() > MAX_CLIENT_NAME {
            return Err(RecordError::FieldTooLong {
                field: "client name",
                max: MAX_CLIENT_NAME,
            });
        }
        Ok(ClientName(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientName {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ClientName::new(&value)
    }
}

impl From<ClientName> for String {
    fn from(name: ClientName) -> Self {
        name.0
    }
}

impl std::fmt::Display for ClientName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A piece of client work that income can be recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    id: EventId,
    date: NaiveDate,
    client: ClientName,
    description: String,
}

impl Event {
    pub fn record(date: NaiveDate, client: &str, description: &str) -> Result<Event, RecordError> {
        Self::record_at(date, client, description, today())
    }

    /// As [`record`](Self::record), with the clock supplied.
    pub fn record_at(
        date: NaiveDate,
        client: &str,
        description: &str,
        today: NaiveDate,
    ) -> Result<Event, RecordError> {
        Ok(Event {
            id: EventId::generate(),
            date: check_date_window(date, today)?,
            client: ClientName::new(client)?,
            description: non_blank(description, "description")?,
        })
    }

    /// Amend the event. The id never changes.
    pub fn update(
        &mut self,
        date: NaiveDate,
        client: &str,
        description: &str,
    ) -> Result<(), RecordError> {
        self.update_at(date, client, description, today())
    }

    pub fn update_at(
        &mut self,
        date: NaiveDate,
        client: &str,
        description: &str,
        today: NaiveDate,
    ) -> Result<(), RecordError> {
        self.date = check_date_window(date, today)?;
        self.client = ClientName::new(client)?;
        self.description = non_blank(description, "description")?;
        Ok(())
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn client(&self) -> &ClientName {
        &self.client
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

fn check_date_window(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, RecordError> {
    let earliest = today - Months::new(12 * YEARS_BACK);
    let latest = today + Months::new(12 * YEARS_FORWARD);
    if date < earliest || date > latest {
        return Err(RecordError::DateOutOfWindow(date));
    }
    Ok(date)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
