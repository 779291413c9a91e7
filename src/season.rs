// Seasonal pricing table selection
use crate::dates::latest_date;
use crate::selection::Selection;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    // May to September inclusive is summer
    pub fn for_date(date: NaiveDate) -> Self {
        match date.month() {
            5..=9 => Season::Summer,
            _ => Season::Winter,
        }
    }

    // Latest event date decides for the whole booking; no dates means winter
    pub fn for_selections(selections: &[Selection]) -> Self {
        latest_date(selections.iter().map(|s| s.date))
            .map(Season::for_date)
            .unwrap_or(Season::Winter)
    }

    // Name of the pricing sheet holding this season's table
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Season::Summer => "Hire Fees May-Sep",
            Season::Winter => "Hire Fees Oct-Apr",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Summer => f.write_str("summer"),
            Season::Winter => f.write_str("winter"),
        }
    }
}
