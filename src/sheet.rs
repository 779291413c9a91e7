// Helpers for reading exported sheet rows (arrays of JSON cells)
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Sheet has no header row")]
    MissingHeader,

    #[error("Missing column: {0}")]
    MissingColumn(String),
}

// Non-empty text content of a cell; numbers are rendered as text
pub fn cell_text(cell: Option<&Value>) -> Option<String> {
    match cell? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Finite numeric content of a cell. Display values like "£1,200" are accepted;
// "NaN" and "inf" are not amounts.
pub fn cell_amount(cell: Option<&Value>) -> Option<f64> {
    let amount = match cell? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != '£' && *c != ',')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    };
    amount.filter(|amount: &f64| amount.is_finite())
}

// Checkbox cells export as booleans, display values as "TRUE"/"FALSE"
pub fn is_checked(cell: Option<&Value>) -> bool {
    match cell {
        Some(Value::Bool(checked)) => *checked,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("TRUE"),
        _ => false,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColumnIndices {
    positions: HashMap<String, usize>,
}

impl ColumnIndices {
    pub fn from_header(header: &[Value]) -> Self {
        let positions = header
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell_text(Some(cell)).map(|name| (name, index)))
            .collect();
        Self { positions }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize, SheetError> {
        self.get(name)
            .ok_or_else(|| SheetError::MissingColumn(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!("TERRACE"), Some("TERRACE"); "plain text")]
    #[test_case(json!("  BRUT "), Some("BRUT"); "trimmed")]
    #[test_case(json!(""), None; "empty string")]
    #[test_case(json!(42), Some("42"); "number")]
    #[test_case(json!(null), None; "null")]
    #[test_case(json!(false), None; "boolean")]
    fn test_cell_text(cell: Value, expected: Option<&str>) {
        assert_eq!(cell_text(Some(&cell)).as_deref(), expected);
    }

    #[test_case(json!(500), Some(500.0); "integer")]
    #[test_case(json!(99.5), Some(99.5); "decimal")]
    #[test_case(json!("£1,200.50"), Some(1200.5); "display currency")]
    #[test_case(json!(""), None; "empty")]
    #[test_case(json!("Hire Fee"), None; "header text")]
    #[test_case(json!("NaN"), None; "not a number")]
    #[test_case(json!("inf"), None; "infinity")]
    #[test_case(json!("-Infinity"), None; "negative infinity")]
    fn test_cell_amount(cell: Value, expected: Option<f64>) {
        assert_eq!(cell_amount(Some(&cell)), expected);
    }

    #[test]
    fn test_is_checked() {
        assert!(is_checked(Some(&json!(true))));
        assert!(is_checked(Some(&json!("TRUE"))));
        assert!(!is_checked(Some(&json!("FALSE"))));
        assert!(!is_checked(Some(&json!(false))));
        assert!(!is_checked(None));
    }

    #[test]
    fn test_column_indices() {
        let header = vec![json!("Date"), json!("Day"), json!(""), json!("Select")];
        let columns = ColumnIndices::from_header(&header);

        assert_eq!(columns.get("Date"), Some(0));
        assert_eq!(columns.require("Select"), Ok(3));
        assert_eq!(
            columns.require("Booking ID"),
            Err(SheetError::MissingColumn("Booking ID".to_string()))
        );
    }
}
