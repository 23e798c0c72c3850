use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::expense::ExpenseCategory;
use super::money::{Money, MoneyError, SignedMoney};
use super::uk::TaxYear;
use super::OwnerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SummaryId(Uuid);

impl SummaryId {
    pub fn generate() -> SummaryId {
        SummaryId(Uuid::new_v4())
    }
}

impl std::fmt::Display for SummaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SummaryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SummaryId(Uuid::parse_str(s)?))
    }
}

/// Expense totals keyed by category. Buckets are expected to share one
/// currency; a mismatched amount surfaces as a [`MoneyError`] when added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<ExpenseCategory, Money>);

impl CategoryTotals {
    pub fn new() -> CategoryTotals {
        CategoryTotals::default()
    }

    /// Add an amount into a category bucket. The first amount for a
    /// category sets the bucket's currency.
    pub fn add(&mut self, category: ExpenseCategory, amount: &Money) -> Result<(), MoneyError> {
        let total = match self.0.get(&category) {
            Some(existing) => existing.add(amount)?,
            None => amount.clone(),
        };
        self.0.insert(category, total);
        Ok(())
    }

    /// Total for a category, zero pounds when the category has no expenses.
    pub fn total_for(&self, category: ExpenseCategory) -> Money {
        self.0.get(&category).cloned().unwrap_or_else(Money::zero)
    }

    pub fn overall_total(&self) -> Result<Money, MoneyError> {
        let mut total = Money::zero();
        for amount in self.0.values() {
            total = total.add(amount)?;
        }
        Ok(total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, &Money)> {
        self.0.iter().map(|(category, amount)| (*category, amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Financial summary of one owner's tax year. Never mutated once
/// generated; regenerating produces a new summary under a new id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxYearSummary {
    id: SummaryId,
    owner: OwnerId,
    tax_year: TaxYear,
    total_income: Money,
    total_expenses: Money,
    category_totals: CategoryTotals,
}

impl TaxYearSummary {
    pub fn generate(
        owner: OwnerId,
        tax_year: TaxYear,
        total_income: Money,
        total_expenses: Money,
        category_totals: CategoryTotals,
    ) -> TaxYearSummary {
        TaxYearSummary {
            id: SummaryId::generate(),
            owner,
            tax_year,
            total_income,
            total_expenses,
            category_totals,
        }
    }

    /// Income minus expenses. Negative when expenses exceed income, which
    /// is why the result is a [`SignedMoney`] rather than a [`Money`].
    pub fn profit(&self) -> Result<SignedMoney, MoneyError> {
        if self.total_expenses.is_greater_than(&self.total_income)? {
            SignedMoney::new(
                self.total_income.amount() - self.total_expenses.amount(),
                self.total_income.currency(),
            )
        } else {
            Ok(self.total_income.subtract(&self.total_expenses)?.to_signed())
        }
    }

    pub fn id(&self) -> SummaryId {
        self.id
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn tax_year(&self) -> TaxYear {
        self.tax_year
    }

    pub fn total_income(&self) -> &Money {
        &self.total_income
    }

    pub fn total_expenses(&self) -> &Money {
        &self.total_expenses
    }

    pub fn category_totals(&self) -> &CategoryTotals {
        &self.category_totals
    }
}

/// Notification payload published after a summary is archived.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryGenerated {
    pub summary_id: SummaryId,
    pub owner: OwnerId,
    pub tax_year: TaxYear,
    pub total_income: Money,
    pub total_expenses: Money,
    pub profit: SignedMoney,
    pub category_totals: CategoryTotals,
    pub occurred_at: DateTime<Utc>,
}

impl SummaryGenerated {
    pub fn from_summary(summary: &TaxYearSummary) -> Result<SummaryGenerated, MoneyError> {
        Ok(SummaryGenerated {
            summary_id: summary.id(),
            owner: summary.owner().clone(),
            tax_year: summary.tax_year(),
            total_income: summary.total_income().clone(),
            total_expenses: summary.total_expenses().clone(),
            profit: summary.profit()?,
            category_totals: summary.category_totals().clone(),
            occurred_at: Utc::now(),
        })
    }
}
