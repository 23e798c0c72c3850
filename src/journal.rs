use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::{Event, EventId, Expense, ExpenseId, Income, IncomeId, Money, OwnerId};
use crate::report::{ExpenseData, ExpenseQuery, IncomeQuery};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JournalError {
    #[error("duplicate event id: {0}")]
    DuplicateEventId(EventId),
    #[error("duplicate income id: {0}")]
    DuplicateIncomeId(IncomeId),
    #[error("duplicate expense id: {0}")]
    DuplicateExpenseId(ExpenseId),
    #[error("event not found: {0}")]
    EventNotFound(EventId),
    #[error("income not found: {0}")]
    IncomeNotFound(IncomeId),
    #[error("expense not found: {0}")]
    ExpenseNotFound(ExpenseId),
    #[error("date range start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// The ledger file: every event, income and expense across all owners.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct Journal {
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    incomes: Vec<Income>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

/// Read a journal from JSON, rejecting duplicate record ids.
pub fn read_journal<R: Read>(reader: R) -> anyhow::Result<Journal> {
    let mut journal: Journal = serde_json::from_reader(reader)?;
    journal.check_ids()?;
    journal.sort_records();
    Ok(journal)
}

impl Journal {
    /// Load the journal file, or start an empty one if it does not exist yet.
    pub fn load(path: &Path) -> anyhow::Result<Journal> {
        if !path.exists() {
            return Ok(Journal::default());
        }
        let file = File::open(path)?;
        read_journal(BufReader::new(file))
    }

    /// Write the journal file, normalizing record order first so in-place
    /// date edits cannot persist out of order.
    pub fn save(&mut self, path: &Path) -> anyhow::Result<()> {
        self.sort_records();
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn incomes(&self) -> &[Income] {
        &self.incomes
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn add_event(&mut self, event: Event) -> Result<(), JournalError> {
        if self.events.iter().any(|e| e.id() == event.id()) {
            return Err(JournalError::DuplicateEventId(event.id()));
        }
        self.events.push(event);
        self.sort_records();
        Ok(())
    }

    pub fn add_income(&mut self, income: Income) -> Result<(), JournalError> {
        if self.incomes.iter().any(|i| i.id() == income.id()) {
            return Err(JournalError::DuplicateIncomeId(income.id()));
        }
        self.incomes.push(income);
        self.sort_records();
        Ok(())
    }

    pub fn add_expense(&mut self, expense: Expense) -> Result<(), JournalError> {
        if self.expenses.iter().any(|e| e.id() == expense.id()) {
            return Err(JournalError::DuplicateExpenseId(expense.id()));
        }
        self.expenses.push(expense);
        self.sort_records();
        Ok(())
    }

    pub fn find_event(&self, id: EventId) -> Result<&Event, JournalError> {
        self.events
            .iter()
            .find(|e| e.id() == id)
            .ok_or(JournalError::EventNotFound(id))
    }

    pub fn find_income(&self, id: IncomeId) -> Result<&Income, JournalError> {
        self.incomes
            .iter()
            .find(|i| i.id() == id)
            .ok_or(JournalError::IncomeNotFound(id))
    }

    pub fn find_expense(&self, id: ExpenseId) -> Result<&Expense, JournalError> {
        self.expenses
            .iter()
            .find(|e| e.id() == id)
            .ok_or(JournalError::ExpenseNotFound(id))
    }

    pub fn find_event_mut(&mut self, id: EventId) -> Result<&mut Event, JournalError> {
        self.events
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(JournalError::EventNotFound(id))
    }

    pub fn find_income_mut(&mut self, id: IncomeId) -> Result<&mut Income, JournalError> {
        self.incomes
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or(JournalError::IncomeNotFound(id))
    }

    pub fn find_expense_mut(&mut self, id: ExpenseId) -> Result<&mut Expense, JournalError> {
        self.expenses
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(JournalError::ExpenseNotFound(id))
    }

    /// Stable sort by record date, so equal dates keep insertion order.
    fn sort_records(&mut self) {
        self.events.sort_by_key(|e| e.date());
        self.incomes.sort_by_key(|i| i.received_date());
        self.expenses.sort_by_key(|e| e.incurred_date());
    }

    fn check_ids(&self) -> Result<(), JournalError> {
        let mut event_ids = HashSet::new();
        for event in &self.events {
            if !event_ids.insert(event.id()) {
                return Err(JournalError::DuplicateEventId(event.id()));
            }
        }
        let mut income_ids = HashSet::new();
        for income in &self.incomes {
            if !income_ids.insert(income.id()) {
                return Err(JournalError::DuplicateIncomeId(income.id()));
            }
        }
        let mut expense_ids = HashSet::new();
        for expense in &self.expenses {
            if !expense_ids.insert(expense.id()) {
                return Err(JournalError::DuplicateExpenseId(expense.id()));
            }
        }
        Ok(())
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), JournalError> {
    if start > end {
        return Err(JournalError::InvalidDateRange { start, end });
    }
    Ok(())
}

impl IncomeQuery for Journal {
    fn income_amounts(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<Money>> {
        check_range(start, end)?;
        Ok(self
            .incomes
            .iter()
            .filter(|i| {
                i.owner() == owner && i.received_date() >= start && i.received_date() <= end
            })
            .map(|i| i.amount().clone())
            .collect())
    }
}

impl ExpenseQuery for Journal {
    fn expense_rows(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<ExpenseData>> {
        check_range(start, end)?;
        Ok(self
            .expenses
            .iter()
            .filter(|e| {
                e.owner() == owner && e.incurred_date() >= start && e.incurred_date() <= end
            })
            .map(|e| ExpenseData {
                amount: e.amount().clone(),
                category: e.category(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExpenseCategory, PaymentStatus};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn gbp(amount: Decimal) -> Money {
        Money::gbp(amount).unwrap()
    }

    fn owner() -> OwnerId {
        OwnerId::new("alice").unwrap()
    }

    fn sample_event() -> Event {
        Event::record_at(ymd(2023, 6, 1), "Acme Ltd", "Website build", ymd(2023, 8, 1)).unwrap()
    }

    fn sample_income(event: EventId, amount: Decimal, date: NaiveDate) -> Income {
        Income::record(owner(), event, gbp(amount), "Invoice", date).unwrap()
    }

    fn sample_expense(amount: Decimal, date: NaiveDate) -> Expense {
        Expense::record(owner(), gbp(amount), ExpenseCategory::Travel, "Train", date).unwrap()
    }

    #[test]
    fn missing_file_loads_as_empty_journal() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::load(&dir.path().join("ledger.json")).unwrap();
        assert!(journal.events().is_empty());
        assert!(journal.incomes().is_empty());
        assert!(journal.expenses().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let mut journal = Journal::default();
        let event = sample_event();
        let income = sample_income(event.id(), dec!(100.00), ymd(2023, 6, 10));
        journal.add_event(event.clone()).unwrap();
        journal.add_income(income.clone()).unwrap();
        journal
            .add_expense(sample_expense(dec!(40.00), ymd(2023, 6, 12)))
            .unwrap();
        journal.save(&path).unwrap();

        let loaded = Journal::load(&path).unwrap();
        assert_eq!(loaded.events(), journal.events());
        assert_eq!(loaded.incomes(), journal.incomes());
        assert_eq!(loaded.expenses(), journal.expenses());
        assert_eq!(loaded.find_income(income.id()).unwrap(), &income);
    }

    #[test]
    fn duplicate_income_id_is_rejected_on_read() {
        let event = sample_event();
        let income = sample_income(event.id(), dec!(100.00), ymd(2023, 6, 10));
        let journal = Journal {
            events: vec![event],
            incomes: vec![income.clone(), income.clone()],
            expenses: vec![],
        };
        let json = serde_json::to_string(&journal).unwrap();

        let err = read_journal(json.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<JournalError>(),
            Some(&JournalError::DuplicateIncomeId(income.id()))
        );
    }

    #[test]
    fn records_are_stored_in_date_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let mut journal = Journal::default();
        let event = sample_event();
        let earlier =
            Event::record_at(ymd(2023, 4, 20), "Beta Ltd", "Logo design", ymd(2023, 8, 1))
                .unwrap();
        journal.add_event(event.clone()).unwrap();
        journal.add_event(earlier.clone()).unwrap();
        journal
            .add_income(sample_income(event.id(), dec!(250.50), ymd(2023, 9, 1)))
            .unwrap();
        journal
            .add_income(sample_income(event.id(), dec!(100.00), ymd(2023, 5, 1)))
            .unwrap();
        journal
            .add_income(sample_income(event.id(), dec!(75.00), ymd(2023, 5, 1)))
            .unwrap();

        assert_eq!(journal.events()[0].id(), earlier.id());
        let dates: Vec<_> = journal
            .incomes()
            .iter()
            .map(|i| i.received_date())
            .collect();
        assert_eq!(dates, vec![ymd(2023, 5, 1), ymd(2023, 5, 1), ymd(2023, 9, 1)]);
        // equal dates keep insertion order
        assert_eq!(journal.incomes()[0].amount(), &gbp(dec!(100.00)));

        journal.save(&path).unwrap();
        let loaded = Journal::load(&path).unwrap();
        let stored: Vec<_> = loaded
            .incomes()
            .iter()
            .map(|i| i.received_date())
            .collect();
        assert_eq!(stored, dates);
    }

    #[test]
    fn date_updates_are_reordered_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let mut journal = Journal::default();
        let event = sample_event();
        journal.add_event(event.clone()).unwrap();
        let first = sample_income(event.id(), dec!(100.00), ymd(2023, 5, 1));
        let id = first.id();
        journal.add_income(first).unwrap();
        journal
            .add_income(sample_income(event.id(), dec!(250.50), ymd(2023, 9, 1)))
            .unwrap();

        journal
            .find_income_mut(id)
            .unwrap()
            .update(gbp(dec!(100.00)), "Invoice", ymd(2023, 12, 1))
            .unwrap();
        journal.save(&path).unwrap();

        let loaded = Journal::load(&path).unwrap();
        let dates: Vec<_> = loaded
            .incomes()
            .iter()
            .map(|i| i.received_date())
            .collect();
        assert_eq!(dates, vec![ymd(2023, 9, 1), ymd(2023, 12, 1)]);
    }

    #[test]
    fn add_rejects_an_id_already_present() {
        let mut journal = Journal::default();
        let event = sample_event();
        journal.add_event(event.clone()).unwrap();
        assert_eq!(
            journal.add_event(event.clone()),
            Err(JournalError::DuplicateEventId(event.id()))
        );
    }

    #[test]
    fn lookups_report_missing_records() {
        let mut journal = Journal::default();
        let id = IncomeId::generate();
        assert_eq!(
            journal.find_income(id),
            Err(JournalError::IncomeNotFound(id))
        );
        let event_id = EventId::generate();
        assert_eq!(
            journal.find_event_mut(event_id).unwrap_err(),
            JournalError::EventNotFound(event_id)
        );
    }

    #[test]
    fn status_changes_apply_through_the_journal() {
        let mut journal = Journal::default();
        let event = sample_event();
        let income = sample_income(event.id(), dec!(100.00), ymd(2023, 6, 10));
        let id = income.id();
        journal.add_event(event).unwrap();
        journal.add_income(income).unwrap();

        journal.find_income_mut(id).unwrap().cancel();
        journal.find_income_mut(id).unwrap().mark_paid();
        assert_eq!(
            journal.find_income(id).unwrap().status(),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn income_query_scopes_by_owner_and_inclusive_range() {
        let mut journal = Journal::default();
        let event = sample_event();
        journal.add_event(event.clone()).unwrap();
        journal
            .add_income(sample_income(event.id(), dec!(100.00), ymd(2023, 4, 6)))
            .unwrap();
        journal
            .add_income(sample_income(event.id(), dec!(250.50), ymd(2024, 4, 5)))
            .unwrap();
        // outside the range
        journal
            .add_income(sample_income(event.id(), dec!(999.00), ymd(2024, 4, 6)))
            .unwrap();
        // another owner
        let other = OwnerId::new("bob").unwrap();
        journal
            .add_income(
                Income::record(other, event.id(), gbp(dec!(77.00)), "Invoice", ymd(2023, 6, 1))
                    .unwrap(),
            )
            .unwrap();

        let amounts = journal
            .income_amounts(&owner(), ymd(2023, 4, 6), ymd(2024, 4, 5))
            .unwrap();
        assert_eq!(amounts, vec![gbp(dec!(100.00)), gbp(dec!(250.50))]);
    }

    #[test]
    fn expense_query_returns_amount_and_category() {
        let mut journal = Journal::default();
        journal
            .add_expense(sample_expense(dec!(40.00), ymd(2023, 6, 12)))
            .unwrap();

        let rows = journal
            .expense_rows(&owner(), ymd(2023, 4, 6), ymd(2024, 4, 5))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, gbp(dec!(40.00)));
        assert_eq!(rows[0].category, ExpenseCategory::Travel);
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let journal = Journal::default();
        let err = journal
            .income_amounts(&owner(), ymd(2024, 4, 5), ymd(2023, 4, 6))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<JournalError>(),
            Some(&JournalError::InvalidDateRange {
                start: ymd(2024, 4, 5),
                end: ymd(2023, 4, 6),
            })
        );
    }
}
