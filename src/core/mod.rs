use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod event;
pub mod expense;
pub mod income;
pub mod money;
pub mod summary;
pub mod uk;

// Flat public surface for domain types.
pub use event::{Event, EventId};
pub use expense::{Expense, ExpenseCategory, ExpenseId};
pub use income::{Income, IncomeId, PaymentStatus, StatusChange};
pub use money::{Money, SignedMoney};
pub use summary::{CategoryTotals, SummaryGenerated, SummaryId, TaxYearSummary};
pub use uk::TaxYear;

/// Validation failure when recording or amending a ledger record.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("{0} must not be blank")]
    BlankField(&'static str),
    #[error("{field} must be {max} characters or fewer")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("date {0} is more than 10 years in the past or 5 years in the future")]
    DateOutOfWindow(chrono::NaiveDate),
}

/// The freelancer a record belongs to. Trimmed, never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(value: &str) -> Result<OwnerId, RecordError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RecordError::BlankField("owner id"));
        }
        Ok(OwnerId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        OwnerId::new(&value)
    }
}

impl From<OwnerId> for String {
    fn from(owner: OwnerId) -> Self {
        owner.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn non_blank(value: &str, field: &'static str) -> Result<String, RecordError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_trims_and_rejects_blank() {
        assert_eq!(OwnerId::new(" alice ").unwrap().as_str(), "alice");
        assert_eq!(
            OwnerId::new("   ").unwrap_err(),
            RecordError::BlankField("owner id")
        );
    }

    #[test]
    fn owner_id_deserialization_validates() {
        let owner: OwnerId = serde_json::from_str(r#""bob""#).unwrap();
        assert_eq!(owner.as_str(), "bob");
        assert!(serde_json::from_str::<OwnerId>(r#""  ""#).is_err());
    }
}
