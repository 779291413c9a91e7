// Booking selections: parsing confirmed-event rows and grouping by time of day
use crate::dates::{latest_date, parse_event_date, DateError};
use crate::sheet::{cell_text, is_checked, ColumnIndices, SheetError};
use crate::types::TimeOfDay;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("Unknown time of day: {0}")]
    UnknownTimeOfDay(String),

    #[error("No events selected")]
    NothingSelected,
}

// Fixed columns of the "Confirmed Events" sheet
pub const DATE_COLUMN: usize = 0;
pub const DAY_OF_WEEK_COLUMN: usize = 1;
pub const ROOM_COLUMN: usize = 2;
pub const TIME_OF_DAY_COLUMN: usize = 3;
pub const EVENT_NAME_COLUMN: usize = 5;
pub const BOOKING_ID_COLUMN: usize = 8;

pub const SELECT_HEADER: &str = "Select";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub room: String,
    pub time_of_day: TimeOfDay,
    pub event_name: Option<String>,
    pub booking_id: Option<String>,
}

impl Selection {
    pub fn new(date: NaiveDate, room: impl Into<String>, time_of_day: TimeOfDay) -> Self {
        Self {
            date,
            day_of_week: String::new(),
            room: room.into(),
            time_of_day,
            event_name: None,
            booking_id: None,
        }
    }

    pub fn from_cells(cells: &[Value]) -> Result<Self, SelectionError> {
        let date_text =
            cell_text(cells.get(DATE_COLUMN)).ok_or(SelectionError::MissingRequiredField("date"))?;
        let date = parse_event_date(&date_text)?;
        let room =
            cell_text(cells.get(ROOM_COLUMN)).ok_or(SelectionError::MissingRequiredField("room"))?;
        let label = cell_text(cells.get(TIME_OF_DAY_COLUMN))
            .ok_or(SelectionError::MissingRequiredField("time of day"))?;
        let time_of_day =
            TimeOfDay::parse(&label).ok_or(SelectionError::UnknownTimeOfDay(label))?;

        Ok(Self {
            date,
            day_of_week: cell_text(cells.get(DAY_OF_WEEK_COLUMN)).unwrap_or_default(),
            room,
            time_of_day,
            event_name: cell_text(cells.get(EVENT_NAME_COLUMN)),
            booking_id: cell_text(cells.get(BOOKING_ID_COLUMN)),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedEvents {
    pub selections: Vec<Selection>,
    // Zero-based positions in the sheet, header row included
    pub row_indices: Vec<usize>,
}

impl SelectedEvents {
    // Header row first; one bad ticked row fails the whole selection
    pub fn from_sheet(rows: &[Vec<Value>]) -> Result<Self, SelectionError> {
        let header = rows.first().ok_or(SheetError::MissingHeader)?;
        let select_column = ColumnIndices::from_header(header).require(SELECT_HEADER)?;

        let mut selected = SelectedEvents::default();
        for (index, row) in rows.iter().enumerate().skip(1) {
            if !is_checked(row.get(select_column)) {
                continue;
            }
            selected.selections.push(Selection::from_cells(row)?);
            selected.row_indices.push(index);
        }

        if selected.selections.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        debug!(count = selected.selections.len(), "Selected events");
        Ok(selected)
    }

    pub fn latest_event_date(&self) -> Option<NaiveDate> {
        latest_date(self.selections.iter().map(|s| s.date))
    }

    // Name of the first selected event, used to derive the booking ID
    pub fn first_event_name(&self) -> Option<&str> {
        self.selections
            .first()
            .and_then(|s| s.event_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedSelection {
    day: Vec<String>,
    night: Vec<String>,
}

impl GroupedSelection {
    pub fn from_selections(selections: &[Selection]) -> Self {
        let mut grouped = GroupedSelection::default();
        for selection in selections {
            grouped.push(selection.time_of_day, selection.room.clone());
        }
        grouped
    }

    pub fn push(&mut self, time_of_day: TimeOfDay, room: String) {
        match time_of_day {
            TimeOfDay::Day => self.day.push(room),
            TimeOfDay::Night => self.night.push(room),
        }
    }

    pub fn rooms(&self, time_of_day: TimeOfDay) -> &[String] {
        match time_of_day {
            TimeOfDay::Day => &self.day,
            TimeOfDay::Night => &self.night,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_empty() && self.night.is_empty()
    }
}
