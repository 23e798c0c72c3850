//! Validate command - surface journal issues before they break a summary

use crate::core::OwnerId;
use crate::journal::Journal;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Journal file to check
    #[arg(short, long, default_value = "ledger.json")]
    journal: PathBuf,

    /// Restrict the check to one owner
    #[arg(short, long)]
    owner: Option<String>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    record: String,
    id: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = Journal::load(&self.journal)?;
        let owner = match &self.owner {
            Some(owner) => Some(OwnerId::new(owner)?),
            None => None,
        };

        let issues = collect_issues(&journal, owner.as_ref());

        if self.json {
            self.print_json(&issues)?;
        } else {
            self.print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue]) {
        let scope = self
            .owner
            .as_deref()
            .map_or("All Owners".to_string(), |o| o.to_string());

        println!();
        println!("VALIDATION RESULTS ({})", scope);
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for (i, issue) in issues.iter().enumerate() {
                println!(
                    "  {}. [{}] {} {}",
                    i + 1,
                    issue.issue_type,
                    issue.record,
                    issue.id
                );
                println!("     {}", issue.message);
                println!();
            }
        }
    }

    fn print_json(&self, issues: &[ValidationIssue]) -> anyhow::Result<()> {
        let output = ValidationOutput {
            owner: self.owner.clone(),
            issue_count: issues.len(),
            issues: issues.to_vec(),
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn collect_issues(journal: &Journal, owner: Option<&OwnerId>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for income in journal.incomes() {
        if owner.is_some_and(|o| income.owner() != o) {
            continue;
        }
        if income.amount().currency() != "GBP" {
            issues.push(ValidationIssue {
                issue_type: "NonGbpAmount".to_string(),
                record: "income".to_string(),
                id: income.id().to_string(),
                message: format!(
                    "amount is in {}; tax year totals are GBP only and generation will fail",
                    income.amount().currency()
                ),
            });
        }
        if journal.find_event(income.event()).is_err() {
            issues.push(ValidationIssue {
                issue_type: "DanglingEventRef".to_string(),
                record: "income".to_string(),
                id: income.id().to_string(),
                message: format!("references event {} which is not in the journal", income.event()),
            });
        }
    }

    for expense in journal.expenses() {
        if owner.is_some_and(|o| expense.owner() != o) {
            continue;
        }
        if expense.amount().currency() != "GBP" {
            issues.push(ValidationIssue {
                issue_type: "NonGbpAmount".to_string(),
                record: "expense".to_string(),
                id: expense.id().to_string(),
                message: format!(
                    "amount is in {}; tax year totals are GBP only and generation will fail",
                    expense.amount().currency()
                ),
            });
        }
    }

    issues
}
