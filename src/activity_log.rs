// Rows appended to the "Logs" sheet
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("Success"),
            Outcome::Failed => f.write_str("Failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub action: String,
    pub outcome: Outcome,
    pub detail: String,
}

impl LogEntry {
    pub fn new(action: impl Into<String>, outcome: Outcome, detail: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            action: action.into(),
            outcome,
            detail: detail.into(),
        }
    }

    pub fn at(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    // Timestamp in the en-GB style the sheet uses, e.g. "04/01/2025, 14:05:09"
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%d/%m/%Y, %H:%M:%S").to_string()
    }

    pub fn to_cells(&self) -> Vec<Value> {
        vec![
            json!(self.formatted_timestamp()),
            json!(self.action),
            json!(self.outcome.to_string()),
            json!(self.detail),
        ]
    }
}
