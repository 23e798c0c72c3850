use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How far a tax year's start may lie from the current calendar year: ten
/// years back for late filings, five years forward for provisional planning.
const YEARS_BACK: i32 = 10;
const YEARS_FORWARD: i32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxYearError {
    #[error("start year {start_year} must be between {min} and {max}")]
    OutOfRange { start_year: i32, min: i32, max: i32 },
}

/// UK tax year (runs 6 April to 5 April).
/// The year value is the start year (e.g., 2024 = the 2024/25 tax year).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TaxYear {
    start_year: i32,
}

impl TaxYear {
    /// Create a tax year, validated against the rolling window around the
    /// current calendar year.
    pub fn of(start_year: i32) -> Result<Self, TaxYearError> {
        Self::of_at(start_year, chrono::Local::now().date_naive())
    }

    /// As [`of`](Self::of), with the clock supplied.
    pub fn of_at(start_year: i32, today: NaiveDate) -> Result<Self, TaxYearError> {
        let current = today.year();
        let min = current - YEARS_BACK;
        let max = current + YEARS_FORWARD;
        if start_year < min || start_year > max {
            return Err(TaxYearError::OutOfRange {
                start_year,
                min,
                max,
            });
        }
        Ok(TaxYear { start_year })
    }

    /// Tax year containing a date.
    pub fn from_date(date: NaiveDate) -> Self {
        let year = date.year();
        // 6 April or later falls in the tax year starting that calendar year,
        // anything earlier in the one that started the year before
        if date >= NaiveDate::from_ymd_opt(year, 4, 6).unwrap() {
            TaxYear { start_year: year }
        } else {
            TaxYear {
                start_year: year - 1,
            }
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Start date of the tax year (6 April)
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year, 4, 6).unwrap()
    }

    /// End date of the tax year (5 April of the following year)
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year + 1, 4, 5).unwrap()
    }

    /// Whether a date falls inside the year, boundaries included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// Display as "2024/25" format
    pub fn display(&self) -> String {
        format!("{}/{:02}", self.start_year, (self.start_year + 1) % 100)
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn tax_year_from_date_before_april_6() {
        // 5 April 2024 is in the 2023/24 tax year
        assert_eq!(TaxYear::from_date(ymd(2024, 4, 5)).start_year(), 2023);
    }

    #[test]
    fn tax_year_from_date_on_april_6() {
        // 6 April 2024 is in the 2024/25 tax year
        assert_eq!(TaxYear::from_date(ymd(2024, 4, 6)).start_year(), 2024);
    }

    #[test]
    fn tax_year_from_date_after_april_6() {
        assert_eq!(TaxYear::from_date(ymd(2024, 4, 7)).start_year(), 2024);
    }

    #[test]
    fn tax_year_from_date_january() {
        // 15 January 2024 is in the 2023/24 tax year
        assert_eq!(TaxYear::from_date(ymd(2024, 1, 15)).start_year(), 2023);
    }

    #[test]
    fn tax_year_from_date_december() {
        assert_eq!(TaxYear::from_date(ymd(2024, 12, 31)).start_year(), 2024);
    }

    #[test]
    fn of_at_accepts_window_boundaries() {
        // current tax year starts 2026
        let today = ymd(2026, 8, 22);
        assert!(TaxYear::of_at(2016, today).is_ok());
        assert!(TaxYear::of_at(2031, today).is_ok());
    }

    #[test]
    fn of_at_rejects_outside_window() {
        let today = ymd(2026, 8, 22);
        assert_eq!(
            TaxYear::of_at(2015, today).unwrap_err(),
            TaxYearError::OutOfRange {
                start_year: 2015,
                min: 2016,
                max: 2031,
            }
        );
        assert!(TaxYear::of_at(2032, today).is_err());
    }

    #[test]
    fn of_at_window_anchors_on_the_calendar_year() {
        // 1 March 2026 is still in the 2025/26 tax year, but the window
        // follows the calendar year
        let today = ymd(2026, 3, 1);
        assert!(TaxYear::of_at(2015, today).is_err());
        assert!(TaxYear::of_at(2016, today).is_ok());
        assert!(TaxYear::of_at(2031, today).is_ok());
        assert!(TaxYear::of_at(2032, today).is_err());
    }

    #[test]
    fn tax_year_start_end_dates() {
        let ty = TaxYear::of_at(2024, ymd(2026, 8, 22)).unwrap();
        assert_eq!(ty.start_date(), ymd(2024, 4, 6));
        assert_eq!(ty.end_date(), ymd(2025, 4, 5));
    }

    #[test]
    fn contains_is_inclusive_of_both_boundaries() {
        let ty = TaxYear::from_date(ymd(2023, 6, 1));
        assert!(ty.contains(ymd(2023, 4, 6)));
        assert!(ty.contains(ymd(2024, 4, 5)));
        assert!(ty.contains(ymd(2023, 12, 25)));
        assert!(!ty.contains(ymd(2023, 4, 5)));
        assert!(!ty.contains(ymd(2024, 4, 6)));
    }

    #[test]
    fn tax_year_display() {
        assert_eq!(TaxYear::from_date(ymd(2023, 6, 1)).display(), "2023/24");
        assert_eq!(TaxYear::from_date(ymd(2024, 6, 1)).display(), "2024/25");
        // single digit end years keep the leading zero
        assert_eq!(TaxYear::from_date(ymd(2008, 6, 1)).display(), "2008/09");
    }

    #[test]
    fn tax_year_serializes_as_plain_year() {
        let ty = TaxYear::from_date(ymd(2023, 6, 1));
        assert_eq!(serde_json::to_string(&ty).unwrap(), "2023");
        let parsed: TaxYear = serde_json::from_str("2023").unwrap();
        assert_eq!(parsed, ty);
    }
}
