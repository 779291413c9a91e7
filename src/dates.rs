// Event date parsing
// Accepts "YYYY-MM-DD", "DD/MM/YY" and "DD/MM/YYYY"; everything else is rejected.
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Unsupported date format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),
}

fn iso_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("ISO date pattern is valid")
    })
}

fn dmy_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{2})/(\d{2})/(\d{2}|\d{4})$").expect("DMY date pattern is valid")
    })
}

// Parse a selection or calendar date. Two-digit years are taken as 20YY.
pub fn parse_event_date(input: &str) -> Result<NaiveDate, DateError> {
    let unsupported = || DateError::UnsupportedFormat(input.to_string());
    let number = |digits: &str| digits.parse::<u32>().map_err(|_| unsupported());

    let (year, month, day) = if let Some(caps) = iso_pattern().captures(input) {
        (number(&caps[1])?, number(&caps[2])?, number(&caps[3])?)
    } else if let Some(caps) = dmy_pattern().captures(input) {
        let mut year = number(&caps[3])?;
        if year < 100 {
            year += 2000;
        }
        (year, number(&caps[2])?, number(&caps[1])?)
    } else {
        return Err(unsupported());
    };

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| DateError::InvalidDate(input.to_string()))
}

// Render a date the way the booking sheets display it, e.g. "04/01/2025"
pub fn format_dmy(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year())
}

pub fn latest_date<I>(dates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates.into_iter().max()
}
