use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;
use super::{non_blank, OwnerId, RecordError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    pub fn generate() -> ExpenseId {
        ExpenseId(Uuid::new_v4())
    }
}

impl std::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ExpenseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ExpenseId(Uuid::parse_str(s)?))
    }
}

/// Closed set of deductible expense categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum ExpenseCategory {
    Travel,
    Equipment,
    OfficeSupplies,
    Software,
    Marketing,
    ProfessionalServices,
    Other,
}

impl ExpenseCategory {
    pub fn name(self) -> &'static str {
        match self {
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Equipment => "Equipment",
            ExpenseCategory::OfficeSupplies => "OfficeSupplies",
            ExpenseCategory::Software => "Software",
            ExpenseCategory::Marketing => "Marketing",
            ExpenseCategory::ProfessionalServices => "ProfessionalServices",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A business cost incurred by the freelancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Expense {
    id: ExpenseId,
    owner: OwnerId,
    amount: Money,
    category: ExpenseCategory,
    description: String,
    incurred_date: NaiveDate,
}

impl Expense {
    pub fn record(
        owner: OwnerId,
        amount: Money,
        category: ExpenseCategory,
        description: &str,
        incurred_date: NaiveDate,
    ) -> Result<Expense, RecordError> {
        Ok(Expense {
            id: ExpenseId::generate(),
            owner,
            amount,
            category,
            description: non_blank(description, "description")?,
            incurred_date,
        })
    }

    /// Amend the expense. The id never changes.
    pub fn update(
        &mut self,
        amount: Money,
        category: ExpenseCategory,
        description: &str,
        incurred_date: NaiveDate,
    ) -> Result<(), RecordError> {
        self.description = non_blank(description, "description")?;
        self.amount = amount;
        self.category = category;
        self.incurred_date = incurred_date;
        Ok(())
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn incurred_date(&self) -> NaiveDate {
        self.incurred_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn expense() -> Expense {
        Expense::record(
            OwnerId::new("alice").unwrap(),
            Money::gbp(dec!(40.00)).unwrap(),
            ExpenseCategory::Travel,
            "train to client",
            ymd(2024, 5, 3),
        )
        .unwrap()
    }

    #[test]
    fn record_trims_description() {
        let expense = Expense::record(
            OwnerId::new("alice").unwrap(),
            Money::gbp(dec!(40.00)).unwrap(),
            ExpenseCategory::Travel,
            "  train to client  ",
            ymd(2024, 5, 3),
        )
        .unwrap();
        assert_eq!(expense.description(), "train to client");
    }

    #[test]
    fn record_rejects_blank_description() {
        let err = Expense::record(
            OwnerId::new("alice").unwrap(),
            Money::gbp(dec!(40.00)).unwrap(),
            ExpenseCategory::Travel,
            "",
            ymd(2024, 5, 3),
        )
        .unwrap_err();
        assert_eq!(err, RecordError::BlankField("description"));
    }

    #[test]
    fn update_keeps_the_id() {
        let mut expense = expense();
        let id = expense.id();
        expense
            .update(
                Money::gbp(dec!(75.25)).unwrap(),
                ExpenseCategory::Equipment,
                "second monitor",
                ymd(2024, 6, 10),
            )
            .unwrap();
        assert_eq!(expense.id(), id);
        assert_eq!(expense.category(), ExpenseCategory::Equipment);
        assert_eq!(expense.amount(), &Money::gbp(dec!(75.25)).unwrap());
    }

    #[test]
    fn categories_order_for_reports() {
        // BTreeMap iteration order follows the declaration order
        assert!(ExpenseCategory::Travel < ExpenseCategory::Equipment);
        assert!(ExpenseCategory::ProfessionalServices < ExpenseCategory::Other);
    }
}
