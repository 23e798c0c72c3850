use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::EventId;
use super::money::Money;
use super::{non_blank, OwnerId, RecordError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct IncomeId(Uuid);

impl IncomeId {
    pub fn generate() -> IncomeId {
        IncomeId(Uuid::new_v4())
    }
}

impl std::fmt::Display for IncomeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IncomeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(IncomeId(Uuid::parse_str(s)?))
    }
}

/// Payment lifecycle of an income record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    MarkPaid,
    MarkOverdue,
    Cancel,
}

impl PaymentStatus {
    /// Apply a status change. The current status is ignored: re-marking a
    /// paid record or reviving a cancelled one both succeed.
    pub fn apply(self, change: StatusChange) -> PaymentStatus {
        match change {
            StatusChange::MarkPaid => PaymentStatus::Paid,
            StatusChange::MarkOverdue => PaymentStatus::Overdue,
            StatusChange::Cancel => PaymentStatus::Cancelled,
        }
    }

    pub fn is_paid(self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }

    pub fn name(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Overdue => "Overdue",
            PaymentStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Money received (or awaited) for a piece of client work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Income {
    id: IncomeId,
    owner: OwnerId,
    event: EventId,
    amount: Money,
    description: String,
    received_date: NaiveDate,
    status: PaymentStatus,
}

impl Income {
    /// Record new income. Starts out [`PaymentStatus::Pending`].
    pub fn record(
        owner: OwnerId,
        event: EventId,
        amount: Money,
        description: &str,
        received_date: NaiveDate,
    ) -> Result<Income, RecordError> {
        Ok(Income {
            id: IncomeId::generate(),
            owner,
            event,
            amount,
            description: non_blank(description, "description")?,
            received_date,
            status: PaymentStatus::Pending,
        })
    }

    /// Amend amount, description and received date. Id and status never change.
    pub fn update(
        &mut self,
        amount: Money,
        description: &str,
        received_date: NaiveDate,
    ) -> Result<(), RecordError> {
        self.description = non_blank(description, "description")?;
        self.amount = amount;
        self.received_date = received_date;
        Ok(())
    }

    pub fn mark_paid(&mut self) {
        self.status = self.status.apply(StatusChange::MarkPaid);
    }

    pub fn mark_overdue(&mut self) {
        self.status = self.status.apply(StatusChange::MarkOverdue);
    }

    pub fn cancel(&mut self) {
        self.status = self.status.apply(StatusChange::Cancel);
    }

    pub fn id(&self) -> IncomeId {
        self.id
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn event(&self) -> EventId {
        self.event
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn received_date(&self) -> NaiveDate {
        self.received_date
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn income() -> Income {
        Income::record(
            OwnerId::new("alice").unwrap(),
            EventId::generate(),
            Money::gbp(dec!(100.00)).unwrap(),
            "logo design",
            ymd(2024, 5, 1),
        )
        .unwrap()
    }

    #[test]
    fn record_starts_pending() {
        assert_eq!(income().status(), PaymentStatus::Pending);
    }

    #[test]
    fn record_rejects_blank_description() {
        let err = Income::record(
            OwnerId::new("alice").unwrap(),
            EventId::generate(),
            Money::gbp(dec!(100.00)).unwrap(),
            "   ",
            ymd(2024, 5, 1),
        )
        .unwrap_err();
        assert_eq!(err, RecordError::BlankField("description"));
    }

    #[test]
    fn transitions_apply_from_every_status() {
        use PaymentStatus::*;
        for start in [Pending, Paid, Overdue, Cancelled] {
            assert_eq!(start.apply(StatusChange::MarkPaid), Paid);
            assert_eq!(start.apply(StatusChange::MarkOverdue), Overdue);
            assert_eq!(start.apply(StatusChange::Cancel), Cancelled);
        }
    }

    #[test]
    fn cancelled_income_can_still_be_marked_paid() {
        let mut income = income();
        income.cancel();
        assert_eq!(income.status(), PaymentStatus::Cancelled);
        income.mark_paid();
        assert_eq!(income.status(), PaymentStatus::Paid);
        assert!(income.status().is_paid());
    }

    #[test]
    fn update_keeps_id_and_status() {
        let mut income = income();
        income.mark_overdue();
        let id = income.id();

        income
            .update(
                Money::gbp(dec!(250.50)).unwrap(),
                "site design",
                ymd(2024, 6, 2),
            )
            .unwrap();

        assert_eq!(income.id(), id);
        assert_eq!(income.status(), PaymentStatus::Overdue);
        assert_eq!(income.amount(), &Money::gbp(dec!(250.50)).unwrap());
        assert_eq!(income.received_date(), ymd(2024, 6, 2));
    }

    #[test]
    fn update_rejects_blank_description() {
        let mut income = income();
        let before = income.clone();
        assert!(income
            .update(Money::gbp(dec!(1)).unwrap(), " ", ymd(2024, 6, 2))
            .is_err());
        assert_eq!(income, before);
    }
}
