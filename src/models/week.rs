//! Billing week resolution
//!
//! Turns a Monday anchor date (`MMDDYY` or `MM/DD/YY`) into the five
//! calendar dates Monday through Friday of that week.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

use super::schedule::Weekday;

/// Number of digits in a complete anchor (MMDDYY)
pub const ANCHOR_DIGITS: usize = 6;

/// Display format for billing dates
pub const DATE_FORMAT: &str = "%m/%d/%y";

/// The five working days of a billing week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWeek {
    dates: [NaiveDate; 5],
}

impl ResolvedWeek {
    /// Expand a Monday into its working week
    pub fn from_monday(monday: NaiveDate) -> Result<Self, WeekError> {
        if monday.weekday() != chrono::Weekday::Mon {
            return Err(WeekError::NotMonday(monday));
        }

        let mut dates = [monday; 5];
        for (offset, date) in dates.iter_mut().enumerate() {
            *date = monday + Duration::days(offset as i64);
        }

        Ok(Self { dates })
    }

    /// Parse and resolve an anchor string
    pub fn resolve(anchor: &str) -> Result<Self, WeekError> {
        let date = parse_anchor(anchor)?;
        Self::from_monday(date)
    }

    /// The Monday this week was resolved from
    pub fn anchor(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn dates(&self) -> &[NaiveDate; 5] {
        &self.dates
    }

    /// The calendar date of a weekday within this week
    pub fn date_for(&self, day: Weekday) -> NaiveDate {
        self.dates[day.index()]
    }

    /// Dates formatted as MM/DD/YY
    pub fn formatted(&self) -> Vec<String> {
        self.dates.iter().map(|d| format_date(*d)).collect()
    }
}

impl fmt::Display for ResolvedWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_date(self.dates[0]),
            format_date(self.dates[4])
        )
    }
}

/// Resolve an anchor into its billing week
pub fn resolve_week(anchor: &str) -> Result<ResolvedWeek, WeekError> {
    ResolvedWeek::resolve(anchor)
}

/// Format a date as MM/DD/YY
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Digits typed so far, with `/` separators dropped
pub fn anchor_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Whether an anchor has all six digits and can be handed to the resolver
pub fn is_complete_anchor(input: &str) -> bool {
    anchor_digits(input).len() >= ANCHOR_DIGITS
}

/// Parse an `MMDDYY` / `MM/DD/YY` anchor; two-digit years are 20YY
pub fn parse_anchor(anchor: &str) -> Result<NaiveDate, WeekError> {
    let trimmed = anchor.trim();
    if trimmed.chars().any(|c| !c.is_ascii_digit() && c != '/') {
        return Err(WeekError::InvalidDate(trimmed.to_string()));
    }

    let digits = anchor_digits(trimmed);
    if digits.len() < ANCHOR_DIGITS {
        return Err(WeekError::Incomplete(digits));
    }
    if digits.len() > ANCHOR_DIGITS {
        return Err(WeekError::InvalidDate(trimmed.to_string()));
    }

    // Six ASCII digits, so these slices and parses cannot fail
    let month: u32 = digits[0..2].parse().unwrap_or(0);
    let day: u32 = digits[2..4].parse().unwrap_or(0);
    let year: i32 = digits[4..6].parse().unwrap_or(0);

    NaiveDate::from_ymd_opt(2000 + year, month, day)
        .ok_or_else(|| WeekError::InvalidDate(trimmed.to_string()))
}

/// Errors resolving a billing week
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekError {
    /// Fewer than six digits entered
    Incomplete(String),
    /// Not a real calendar date
    InvalidDate(String),
    /// A real date, but not a Monday
    NotMonday(NaiveDate),
}

impl fmt::Display for WeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete(digits) => {
                write!(f, "Anchor '{}' is incomplete (expected MMDDYY)", digits)
            }
            Self::InvalidDate(input) => write!(f, "'{}' is not a valid MMDDYY date", input),
            Self::NotMonday(date) => write!(
                f,
                "The date provided does not fall on Monday: {}",
                format_date(*date)
            ),
        }
    }
}

impl std::error::Error for WeekError {}
