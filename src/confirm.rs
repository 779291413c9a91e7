// Confirming pencil holds from the calendar into "Confirmed Events" rows
use crate::activity_log::{LogEntry, Outcome};
use crate::dates::{format_dmy, parse_event_date, DateError};
use crate::sheet::{cell_text, ColumnIndices, SheetError};
use crate::types::TimeOfDay;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIRMED_STATUS: &str = "Confirmed";
pub const CALENDAR_ID_HEADER: &str = "Calendar ID";
const CONFIRMATION_ACTION: &str = "Event Confirmation";

// Pencil calendar layout: weekday in column A, date in column B, rooms after
const CALENDAR_DAY_COLUMN: usize = 0;
const CALENDAR_DATE_COLUMN: usize = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmError {
    #[error("No events selected")]
    NothingSelected,

    #[error("Events are already confirmed for these days: {}", .0.join(", "))]
    AlreadyConfirmed(Vec<String>),

    #[error("Calendar column {0} is not a room column")]
    UnknownCalendarColumn(usize),

    #[error("Calendar row {0} has no date")]
    MissingDate(usize),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

// Which room and period a calendar column represents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarColumn {
    pub room: String,
    pub time_of_day: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PencilHold {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub room: String,
    pub time_of_day: TimeOfDay,
    pub event_name: String,
}

impl PencilHold {
    // e.g. "04/01/2025 Saturday BRUT DAY"
    pub fn calendar_id(&self) -> String {
        format!(
            "{} {} {} {}",
            format_dmy(self.date),
            self.day_of_week,
            self.room,
            self.time_of_day
        )
    }
}

// `highlighted` is zero-based (row, column); rows with no entries are skipped
pub fn holds_from_calendar(
    grid: &[Vec<Value>],
    highlighted: &[(usize, usize)],
    columns: &[Option<CalendarColumn>],
) -> Result<Vec<PencilHold>, ConfirmError> {
    let mut holds = Vec::new();

    for &(row_index, col_index) in highlighted {
        let Some(row) = grid.get(row_index) else {
            continue;
        };
        let has_entries = row
            .iter()
            .skip(CALENDAR_DATE_COLUMN + 1)
            .any(|cell| cell_text(Some(cell)).is_some());
        if !has_entries {
            continue;
        }

        let column = columns
            .get(col_index)
            .and_then(Option::as_ref)
            .ok_or(ConfirmError::UnknownCalendarColumn(col_index))?;
        let date_text = cell_text(row.get(CALENDAR_DATE_COLUMN))
            .ok_or(ConfirmError::MissingDate(row_index))?;

        holds.push(PencilHold {
            date: parse_event_date(&date_text)?,
            day_of_week: cell_text(row.get(CALENDAR_DAY_COLUMN)).unwrap_or_default(),
            room: column.room.clone(),
            time_of_day: column.time_of_day,
            event_name: cell_text(row.get(col_index)).unwrap_or_default(),
        });
    }

    Ok(holds)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedEvent {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub room: String,
    pub time_of_day: TimeOfDay,
    pub calendar_id: String,
    pub event_name: String,
    pub notes: String,
    pub status: String,
    pub booking_id: String,
    pub start_time: String,
    pub end_time: String,
    pub selected: bool,
}

impl From<&PencilHold> for ConfirmedEvent {
    fn from(hold: &PencilHold) -> Self {
        Self {
            date: hold.date,
            day_of_week: hold.day_of_week.clone(),
            room: hold.room.clone(),
            time_of_day: hold.time_of_day,
            calendar_id: hold.calendar_id(),
            event_name: hold.event_name.clone(),
            notes: String::new(),
            status: CONFIRMED_STATUS.to_string(),
            booking_id: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            selected: false,
        }
    }
}

impl ConfirmedEvent {
    pub fn to_cells(&self) -> Vec<Value> {
        vec![
            json!(format_dmy(self.date)),
            json!(self.day_of_week),
            json!(self.room),
            json!(self.time_of_day.as_str()),
            json!(self.calendar_id),
            json!(self.event_name),
            json!(self.notes),
            json!(self.status),
            json!(self.booking_id),
            json!(self.start_time),
            json!(self.end_time),
            json!(self.selected),
        ]
    }
}

// Calendar IDs already present in a "Confirmed Events" export (header first)
pub fn existing_calendar_ids(rows: &[Vec<Value>]) -> Result<HashSet<String>, SheetError> {
    let header = rows.first().ok_or(SheetError::MissingHeader)?;
    let column = ColumnIndices::from_header(header).require(CALENDAR_ID_HEADER)?;
    Ok(rows
        .iter()
        .skip(1)
        .filter_map(|row| cell_text(row.get(column)))
        .collect())
}

// All or nothing: one existing calendar ID rejects the whole batch
pub fn plan_confirmation(
    holds: &[PencilHold],
    existing: &HashSet<String>,
) -> Result<Vec<ConfirmedEvent>, ConfirmError> {
    if holds.is_empty() {
        return Err(ConfirmError::NothingSelected);
    }

    let events: Vec<ConfirmedEvent> = holds.iter().map(ConfirmedEvent::from).collect();
    let clashes: Vec<String> = events
        .iter()
        .filter(|event| existing.contains(&event.calendar_id))
        .map(|event| event.calendar_id.clone())
        .collect();

    if !clashes.is_empty() {
        warn!(clashes = ?clashes, "Events already confirmed");
        return Err(ConfirmError::AlreadyConfirmed(clashes));
    }

    info!(count = events.len(), "Events ready to confirm");
    Ok(events)
}

// Log row describing the outcome of a confirmation attempt
pub fn confirmation_log(result: &Result<Vec<ConfirmedEvent>, ConfirmError>) -> LogEntry {
    match result {
        Ok(events) => {
            let confirmed: Vec<String> = events
                .iter()
                .map(|event| format!("{} {}", event.event_name, event.calendar_id))
                .collect();
            LogEntry::new(
                CONFIRMATION_ACTION,
                Outcome::Success,
                format!("Events confirmed: {}", confirmed.join(", ")),
            )
        }
        Err(ConfirmError::AlreadyConfirmed(ids)) => LogEntry::new(
            CONFIRMATION_ACTION,
            Outcome::Failed,
            format!("Events already confirmed: {}", ids.join(", ")),
        ),
        Err(err) => LogEntry::new(CONFIRMATION_ACTION, Outcome::Failed, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(date: &str, room: &str, time_of_day: TimeOfDay) -> PencilHold {
        PencilHold {
            date: parse_event_date(date).unwrap(),
            day_of_week: "Saturday".to_string(),
            room: room.to_string(),
            time_of_day,
            event_name: "Test".to_string(),
        }
    }

    fn layout() -> Vec<Option<CalendarColumn>> {
        vec![
            None,
            None,
            Some(CalendarColumn {
                room: "BRUT".to_string(),
                time_of_day: TimeOfDay::Day,
            }),
            Some(CalendarColumn {
                room: "BRUT".to_string(),
                time_of_day: TimeOfDay::Night,
            }),
        ]
    }

    #[test]
    fn test_calendar_id() {
        let hold = hold("04/01/2025", "BRUT", TimeOfDay::Day);
        assert_eq!(hold.calendar_id(), "04/01/2025 Saturday BRUT DAY");
    }

    #[test]
    fn test_holds_from_calendar() {
        let grid = vec![
            vec![json!("Day"), json!("Date"), json!("BRUT DAY"), json!("BRUT NIGHT")],
            vec![json!("Saturday"), json!("04/01/2025"), json!("Wedding"), json!("Party")],
            vec![json!("Sunday"), json!("05/01/2025"), json!(""), json!("")],
        ];

        let holds = holds_from_calendar(&grid, &[(1, 3), (2, 2)], &layout()).unwrap();
        assert_eq!(holds.len(), 1);
        assert_eq!(holds[0].room, "BRUT");
        assert_eq!(holds[0].time_of_day, TimeOfDay::Night);
        assert_eq!(holds[0].event_name, "Party");
        assert_eq!(holds[0].calendar_id(), "04/01/2025 Saturday BRUT NIGHT");
    }

    #[test]
    fn test_holds_from_calendar_rejects_unmapped_column() {
        let grid = vec![vec![json!("Saturday"), json!("04/01/2025"), json!("Wedding")]];
        assert_eq!(
            holds_from_calendar(&grid, &[(0, 1)], &layout()),
            Err(ConfirmError::UnknownCalendarColumn(1))
        );
    }

    #[test]
    fn test_confirmed_event_row() {
        let event = ConfirmedEvent::from(&hold("04/01/2025", "BRUT", TimeOfDay::Day));
        let cells = event.to_cells();

        assert_eq!(cells.len(), 12);
        assert_eq!(cells[0], json!("04/01/2025"));
        assert_eq!(cells[3], json!("DAY"));
        assert_eq!(cells[4], json!("04/01/2025 Saturday BRUT DAY"));
        assert_eq!(cells[7], json!("Confirmed"));
        assert_eq!(cells[11], json!(false));
    }

    #[test]
    fn test_plan_confirmation() {
        let holds = vec![
            hold("04/01/2025", "BRUT", TimeOfDay::Day),
            hold("04/01/2025", "BRUT", TimeOfDay::Night),
        ];
        let events = plan_confirmation(&holds, &HashSet::new()).unwrap();
        assert_eq!(events.len(), 2);

        let log = confirmation_log(&Ok(events));
        assert_eq!(log.outcome, Outcome::Success);
        assert_eq!(
            log.detail,
            "Events confirmed: Test 04/01/2025 Saturday BRUT DAY, Test 04/01/2025 Saturday BRUT NIGHT"
        );
    }

    #[test]
    fn test_plan_confirmation_is_all_or_nothing() {
        let holds = vec![
            hold("04/01/2025", "BRUT", TimeOfDay::Day),
            hold("04/01/2025", "BRUT", TimeOfDay::Night),
        ];
        let existing: HashSet<String> = ["04/01/2025 Saturday BRUT NIGHT".to_string()].into();

        let result = plan_confirmation(&holds, &existing);
        assert_eq!(
            result,
            Err(ConfirmError::AlreadyConfirmed(vec![
                "04/01/2025 Saturday BRUT NIGHT".to_string()
            ]))
        );
        assert_eq!(confirmation_log(&result).outcome, Outcome::Failed);
    }

    #[test]
    fn test_plan_confirmation_needs_holds() {
        assert_eq!(
            plan_confirmation(&[], &HashSet::new()),
            Err(ConfirmError::NothingSelected)
        );
    }

    #[test]
    fn test_existing_calendar_ids() {
        let rows = vec![
            vec![json!("Date"), json!("Calendar ID")],
            vec![json!("04/01/2025"), json!("04/01/2025 Saturday BRUT DAY")],
            vec![json!("05/01/2025"), json!("")],
        ];
        let ids = existing_calendar_ids(&rows).unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("04/01/2025 Saturday BRUT DAY"));
    }
}
