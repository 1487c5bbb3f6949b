//! Cell value representation for spreadsheet-backed tables

use chrono::{NaiveDateTime, Timelike};

/// A single cell in a table
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Blank cell
    #[default]
    Empty,
    /// Text
    String(String),
    /// Whole number
    Int(i64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Date and time (no timezone, as Excel stores it)
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Build a text cell, mapping blank input to `Empty`
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(s)
        }
    }

    /// Check if the cell carries no content (empty or whitespace-only text)
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as text, the form used for keys and CSV export
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => format_datetime(dt),
        }
    }

    /// Normalized key form: trimmed text, so `5`, `5.0` and `" 5 "` compare equal
    pub fn as_key(&self) -> String {
        self.to_text().trim().to_string()
    }

    /// Flatten the cell to a JSON primitive; timestamps become text
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Empty => serde_json::Value::String(String::new()),
            CellValue::String(s) => serde_json::Value::String(s.clone()),
            CellValue::Int(i) => serde_json::Value::from(*i),
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(f.to_string())),
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
            CellValue::DateTime(dt) => serde_json::Value::String(format_datetime(dt)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

/// Dates at midnight render without a time component
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Parse ISO-like timestamps as written by Excel or by `format_datetime`
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_key_normalization_matches_numbers_and_strings() {
        assert_eq!(CellValue::Int(1042).as_key(), "1042");
        assert_eq!(CellValue::Float(1042.0).as_key(), "1042");
        assert_eq!(CellValue::String(" 1042 ".into()).as_key(), "1042");
        assert_eq!(CellValue::Float(2.5).as_key(), "2.5");
        assert_eq!(CellValue::Empty.as_key(), "");
    }

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::String("   ".into()).is_blank());
        assert!(!CellValue::Int(0).is_blank());
        assert_eq!(CellValue::text("  "), CellValue::Empty);
    }

    #[test]
    fn test_to_json_flattens_scalars() {
        assert_eq!(CellValue::Int(5).to_json(), serde_json::json!(5));
        assert_eq!(CellValue::Bool(true).to_json(), serde_json::json!(true));
        assert_eq!(CellValue::Empty.to_json(), serde_json::json!(""));

        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            CellValue::DateTime(midnight).to_json(),
            serde_json::json!("2024-03-01")
        );

        let afternoon = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(
            CellValue::DateTime(afternoon).to_json(),
            serde_json::json!("2024-03-01 14:30:00")
        );
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2024-03-01").is_some());
        assert!(parse_datetime("2024-03-01T09:15:00").is_some());
        assert!(parse_datetime("2024-03-01 09:15:00").is_some());
        assert!(parse_datetime("next tuesday").is_none());
    }
}
