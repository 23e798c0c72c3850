use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::{SummaryId, TaxYearSummary};
use crate::report::SummaryStore;

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveFile {
    #[serde(default)]
    pub summaries: Vec<TaxYearSummary>,
}

/// File-backed archive of generated summaries. Saves append; existing
/// entries are never rewritten, so regenerating a tax year adds a second
/// summary under its own id.
pub struct SummaryArchive {
    path: PathBuf,
}

impl SummaryArchive {
    pub fn new(path: impl Into<PathBuf>) -> SummaryArchive {
        SummaryArchive { path: path.into() }
    }

    pub fn summaries(&self) -> anyhow::Result<Vec<TaxYearSummary>> {
        Ok(self.read()?.summaries)
    }

    fn read(&self) -> anyhow::Result<ArchiveFile> {
        if !self.path.exists() {
            return Ok(ArchiveFile::default());
        }
        let file = File::open(&self.path)?;
        let archive = serde_json::from_reader(BufReader::new(file))?;
        Ok(archive)
    }

    fn write(&self, archive: &ArchiveFile) -> anyhow::Result<()> {
        let mut json = serde_json::to_string_pretty(archive)?;
        json.push('\n');
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SummaryStore for SummaryArchive {
    fn save(&self, summary: &TaxYearSummary) -> anyhow::Result<()> {
        let mut archive = self.read()?;
        archive.summaries.push(summary.clone());
        self.write(&archive)
    }

    fn find_by_id(&self, id: SummaryId) -> anyhow::Result<Option<TaxYearSummary>> {
        Ok(self.read()?.summaries.into_iter().find(|s| s.id() == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CategoryTotals, Money, OwnerId, TaxYear};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_summary() -> TaxYearSummary {
        let today = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        TaxYearSummary::generate(
            OwnerId::new("alice").unwrap(),
            TaxYear::of_at(2023, today).unwrap(),
            Money::gbp(dec!(350.50)).unwrap(),
            Money::gbp(dec!(125.25)).unwrap(),
            CategoryTotals::new(),
        )
    }

    #[test]
    fn missing_file_holds_no_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = SummaryArchive::new(dir.path().join("summaries.json"));
        assert!(archive.summaries().unwrap().is_empty());
        assert_eq!(archive.find_by_id(SummaryId::generate()).unwrap(), None);
    }

    #[test]
    fn saved_summary_is_found_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let archive = SummaryArchive::new(dir.path().join("summaries.json"));
        let summary = sample_summary();

        archive.save(&summary).unwrap();

        assert_eq!(archive.find_by_id(summary.id()).unwrap(), Some(summary));
    }

    #[test]
    fn saves_append_rather_than_replace() {
        let dir = tempfile::tempdir().unwrap();
        let archive = SummaryArchive::new(dir.path().join("summaries.json"));
        let first = sample_summary();
        let second = sample_summary();

        archive.save(&first).unwrap();
        archive.save(&second).unwrap();

        let summaries = archive.summaries().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(archive.find_by_id(first.id()).unwrap(), Some(first));
        assert_eq!(archive.find_by_id(second.id()).unwrap(), Some(second));
    }
}
