use chrono::NaiveDate;

use crate::core::{
    CategoryTotals, ExpenseCategory, Money, OwnerId, SummaryGenerated, SummaryId, TaxYear,
    TaxYearSummary,
};

/// One expense row as the summary engine consumes it.
#[derive(Debug, Clone)]
pub struct ExpenseData {
    pub amount: Money,
    pub category: ExpenseCategory,
}

/// Income amounts for an owner with a received date in `[start, end]`,
/// regardless of payment status. Implementations return rows already
/// scoped to the range; the engine does not re-filter.
pub trait IncomeQuery {
    fn income_amounts(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<Money>>;
}

/// Expense rows for an owner with an incurred date in `[start, end]`.
pub trait ExpenseQuery {
    fn expense_rows(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<ExpenseData>>;
}

pub trait SummaryStore {
    fn save(&self, summary: &TaxYearSummary) -> anyhow::Result<()>;
    fn find_by_id(&self, id: SummaryId) -> anyhow::Result<Option<TaxYearSummary>>;
}

pub trait SummaryPublisher {
    fn publish(&self, event: &SummaryGenerated) -> anyhow::Result<()>;
}

/// Publisher that records the notification in the application log.
pub struct LogPublisher;

impl SummaryPublisher for LogPublisher {
    fn publish(&self, event: &SummaryGenerated) -> anyhow::Result<()> {
        log::info!(
            "Summary {} generated for {} ({}): profit {} {}",
            event.summary_id,
            event.owner,
            event.tax_year,
            event.profit.amount(),
            event.profit.currency()
        );
        Ok(())
    }
}

/// Computes tax year summaries from the income and expense records and
/// archives them. The two queries are independent snapshots; there is no
/// cross-store transaction.
pub struct SummaryEngine<'a> {
    incomes: &'a dyn IncomeQuery,
    expenses: &'a dyn ExpenseQuery,
    store: &'a dyn SummaryStore,
    publisher: &'a dyn SummaryPublisher,
}

impl<'a> SummaryEngine<'a> {
    pub fn new(
        incomes: &'a dyn IncomeQuery,
        expenses: &'a dyn ExpenseQuery,
        store: &'a dyn SummaryStore,
        publisher: &'a dyn SummaryPublisher,
    ) -> SummaryEngine<'a> {
        SummaryEngine {
            incomes,
            expenses,
            store,
            publisher,
        }
    }

    /// Compute and archive the summary for one owner and tax year. The
    /// notification fires only after the summary is saved; a publish
    /// failure never fails the generation.
    pub fn generate(&self, owner: &OwnerId, tax_year: TaxYear) -> anyhow::Result<TaxYearSummary> {
        let start = tax_year.start_date();
        let end = tax_year.end_date();

        let mut total_income = Money::zero();
        for amount in self.incomes.income_amounts(owner, start, end)? {
            total_income = total_income.add(&amount)?;
        }

        let mut total_expenses = Money::zero();
        let mut category_totals = CategoryTotals::new();
        for expense in self.expenses.expense_rows(owner, start, end)? {
            total_expenses = total_expenses.add(&expense.amount)?;
            category_totals.add(expense.category, &expense.amount)?;
        }

        let summary = TaxYearSummary::generate(
            owner.clone(),
            tax_year,
            total_income,
            total_expenses,
            category_totals,
        );
        self.store.save(&summary)?;
        self.notify(&summary);
        Ok(summary)
    }

    pub fn find_by_id(&self, id: SummaryId) -> anyhow::Result<Option<TaxYearSummary>> {
        self.store.find_by_id(id)
    }

    fn notify(&self, summary: &TaxYearSummary) {
        match SummaryGenerated::from_summary(summary) {
            Ok(event) => {
                if let Err(err) = self.publisher.publish(&event) {
                    log::warn!("Failed to publish summary notification: {}", err);
                }
            }
            Err(err) => log::warn!("Failed to build summary notification: {}", err),
        }
    }
}
