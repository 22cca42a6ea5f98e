use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{MaribelError, Result};
use crate::models::{BudgetStatus, CampaignStatus, ExpenseStatus};

// ---------------------------------------------------------------------------
// Field types and values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    DateTime,
    CampaignStatus,
    ExpenseStatus,
    BudgetStatus,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::DateTime => "date/time",
            Self::CampaignStatus => "campaign status",
            Self::ExpenseStatus => "expense status",
            Self::BudgetStatus => "budget status",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Blank input cell. Not an error; required-field checks happen upstream.
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    CampaignStatus(CampaignStatus),
    ExpenseStatus(ExpenseStatus),
    BudgetStatus(BudgetStatus),
}

impl FieldValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_float(self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_datetime(self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(v) => Some(v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Accepted date/time patterns, tried in order; first match wins. Month-first
/// US dates take precedence over day-first when both would parse.
const DATE_FORMATS: &[(&str, bool)] = &[
    ("%Y-%m-%d %H:%M:%S", true),
    ("%Y-%m-%d", false),
    ("%m/%d/%Y", false),
    ("%d/%m/%Y", false),
    ("%Y/%m/%d", false),
    ("%d/%m/%Y %H:%M:%S", true),
    ("%m/%d/%Y %H:%M:%S", true),
    ("%Y/%m/%d %H:%M:%S", true),
];

/// Convert one raw cell to a typed value. Blank input is `Empty`, one layer
/// of surrounding double quotes is stripped, numbers follow French-style
/// decimal rules and must be strictly positive.
pub fn coerce(raw: &str, target: FieldType) -> Result<FieldValue> {
    if raw.trim().is_empty() {
        return Ok(FieldValue::Empty);
    }
    let value = strip_quotes(raw.trim());

    match target {
        FieldType::Text => Ok(FieldValue::Text(value.trim().to_string())),
        FieldType::Integer => {
            let n: i64 = value.trim().parse().map_err(|_| invalid_cast(value, target))?;
            if n <= 0 {
                return Err(MaribelError::OutOfRange(value.to_string()));
            }
            Ok(FieldValue::Integer(n))
        }
        FieldType::Float => {
            let f = parse_decimal(value).ok_or_else(|| invalid_cast(value, target))?;
            if !f.is_finite() {
                return Err(invalid_cast(value, target));
            }
            if f <= 0.0 {
                return Err(MaribelError::OutOfRange(value.to_string()));
            }
            Ok(FieldValue::Float(f))
        }
        FieldType::Boolean => {
            let v = value.trim();
            if v.eq_ignore_ascii_case("true") {
                Ok(FieldValue::Boolean(true))
            } else if v.eq_ignore_ascii_case("false") {
                Ok(FieldValue::Boolean(false))
            } else {
                Err(invalid_cast(value, target))
            }
        }
        FieldType::DateTime => parse_datetime(value)
            .map(FieldValue::DateTime)
            .ok_or_else(|| MaribelError::InvalidFormat(value.to_string())),
        FieldType::CampaignStatus => CampaignStatus::parse(value)
            .map(FieldValue::CampaignStatus)
            .ok_or_else(|| invalid_cast(value, target)),
        FieldType::ExpenseStatus => ExpenseStatus::parse(value)
            .map(FieldValue::ExpenseStatus)
            .ok_or_else(|| invalid_cast(value, target)),
        FieldType::BudgetStatus => BudgetStatus::parse(value)
            .map(FieldValue::BudgetStatus)
            .ok_or_else(|| invalid_cast(value, target)),
    }
}

fn invalid_cast(value: &str, target: FieldType) -> MaribelError {
    MaribelError::InvalidCast {
        value: value.to_string(),
        target: target.name().to_string(),
    }
}

/// Strip one layer of surrounding double quotes, if both sides carry one.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// French-style decimal parse: a decimal point is normalized to the comma,
/// group separators (space, NBSP) are dropped, at most one decimal
/// separator is allowed.
fn parse_decimal(value: &str) -> Option<f64> {
    let normalized = value.trim().replace('.', ",").replace([' ', '\u{a0}'], "");
    if normalized.matches(',').count() > 1 {
        return None;
    }
    normalized.replace(',', ".").parse().ok()
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for (pattern, has_time) in DATE_FORMATS {
        if *has_time {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
                return Some(dt);
            }
        } else if let Ok(d) = NaiveDate::parse_from_str(value, pattern) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_blank_input_is_empty_not_error() {
        assert_eq!(coerce("", FieldType::Float).unwrap(), FieldValue::Empty);
        assert_eq!(coerce("   ", FieldType::Integer).unwrap(), FieldValue::Empty);
        assert_eq!(coerce("\t", FieldType::Text).unwrap(), FieldValue::Empty);
    }

    #[test]
    fn test_text_trims_and_strips_quotes() {
        assert_eq!(
            coerce("\" Spring Push \"", FieldType::Text).unwrap(),
            FieldValue::Text("Spring Push".to_string())
        );
        assert_eq!(
            coerce("Ads, online", FieldType::Text).unwrap(),
            FieldValue::Text("Ads, online".to_string())
        );
    }

    #[test]
    fn test_one_quote_layer_only() {
        assert_eq!(
            coerce("\"\"quoted\"\"", FieldType::Text).unwrap(),
            FieldValue::Text("\"quoted\"".to_string())
        );
    }

    #[test]
    fn test_integer_parse() {
        assert_eq!(coerce("42", FieldType::Integer).unwrap(), FieldValue::Integer(42));
        assert_eq!(coerce("\"7\"", FieldType::Integer).unwrap(), FieldValue::Integer(7));
    }

    #[test]
    fn test_integer_must_be_positive() {
        assert!(matches!(coerce("0", FieldType::Integer), Err(MaribelError::OutOfRange(_))));
        assert!(matches!(coerce("-3", FieldType::Integer), Err(MaribelError::OutOfRange(_))));
    }

    #[test]
    fn test_integer_garbage_is_invalid_cast() {
        assert!(matches!(
            coerce("12.5", FieldType::Integer),
            Err(MaribelError::InvalidCast { .. })
        ));
        assert!(matches!(
            coerce("abc", FieldType::Integer),
            Err(MaribelError::InvalidCast { .. })
        ));
    }

    #[test]
    fn test_float_accepts_point_and_comma() {
        assert_eq!(coerce("500.25", FieldType::Float).unwrap(), FieldValue::Float(500.25));
        assert_eq!(coerce("500,25", FieldType::Float).unwrap(), FieldValue::Float(500.25));
        assert_eq!(coerce("\"500.25\"", FieldType::Float).unwrap(), FieldValue::Float(500.25));
    }

    #[test]
    fn test_float_accepts_grouped_digits() {
        assert_eq!(
            coerce("1 234,56", FieldType::Float).unwrap(),
            FieldValue::Float(1234.56)
        );
        assert_eq!(
            coerce("1\u{a0}000", FieldType::Float).unwrap(),
            FieldValue::Float(1000.0)
        );
    }

    #[test]
    fn test_float_rejects_two_decimal_separators() {
        assert!(matches!(
            coerce("1.234,56", FieldType::Float),
            Err(MaribelError::InvalidCast { .. })
        ));
    }

    #[test]
    fn test_float_must_be_positive() {
        assert!(matches!(coerce("0", FieldType::Float), Err(MaribelError::OutOfRange(_))));
        assert!(matches!(coerce("0.0", FieldType::Float), Err(MaribelError::OutOfRange(_))));
        assert!(matches!(coerce("-12,5", FieldType::Float), Err(MaribelError::OutOfRange(_))));
    }

    #[test]
    fn test_float_round_trip_for_positive_decimals() {
        for x in [0.01, 1.0, 42.1, 500.25, 99999.99] {
            let rendered = format!("{x}");
            assert_eq!(coerce(&rendered, FieldType::Float).unwrap(), FieldValue::Float(x));
        }
    }

    #[test]
    fn test_boolean_strict_parse() {
        assert_eq!(coerce("true", FieldType::Boolean).unwrap(), FieldValue::Boolean(true));
        assert_eq!(coerce("FALSE", FieldType::Boolean).unwrap(), FieldValue::Boolean(false));
        assert!(matches!(
            coerce("yes", FieldType::Boolean),
            Err(MaribelError::InvalidCast { .. })
        ));
    }

    #[test]
    fn test_date_formats_in_order() {
        assert_eq!(
            coerce("2024-01-10", FieldType::DateTime).unwrap(),
            FieldValue::DateTime(date(2024, 1, 10))
        );
        assert_eq!(
            coerce("2024/01/10", FieldType::DateTime).unwrap(),
            FieldValue::DateTime(date(2024, 1, 10))
        );
        assert_eq!(
            coerce("2024-01-10 14:30:00", FieldType::DateTime).unwrap(),
            FieldValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(14, 30, 0).unwrap()
            )
        );
    }

    #[test]
    fn test_month_first_wins_when_ambiguous() {
        // 01/02/2024 parses as January 2nd, not February 1st
        assert_eq!(
            coerce("01/02/2024", FieldType::DateTime).unwrap(),
            FieldValue::DateTime(date(2024, 1, 2))
        );
        // 13 is not a valid month, so day-first picks it up
        assert_eq!(
            coerce("13/01/2024", FieldType::DateTime).unwrap(),
            FieldValue::DateTime(date(2024, 1, 13))
        );
    }

    #[test]
    fn test_unparseable_date_is_invalid_format() {
        assert!(matches!(
            coerce("January 10, 2024", FieldType::DateTime),
            Err(MaribelError::InvalidFormat(_))
        ));
        assert!(matches!(
            coerce("2024-13-40", FieldType::DateTime),
            Err(MaribelError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_status_by_ordinal_and_name() {
        assert_eq!(
            coerce("2", FieldType::CampaignStatus).unwrap(),
            FieldValue::CampaignStatus(CampaignStatus::Confirmed)
        );
        assert_eq!(
            coerce("archived", FieldType::ExpenseStatus).unwrap(),
            FieldValue::ExpenseStatus(ExpenseStatus::Archived)
        );
        assert_eq!(
            coerce("Draft", FieldType::BudgetStatus).unwrap(),
            FieldValue::BudgetStatus(BudgetStatus::Draft)
        );
    }

    #[test]
    fn test_unknown_status_is_invalid_cast() {
        assert!(matches!(
            coerce("99", FieldType::CampaignStatus),
            Err(MaribelError::InvalidCast { .. })
        ));
        assert!(matches!(
            coerce("pending", FieldType::ExpenseStatus),
            Err(MaribelError::InvalidCast { .. })
        ));
    }
}
