//! Type compatibility checks and coercion between raw JSON values and
//! template defaults.
//!
//! Raw values are compared against the real type of the template default
//! after a fixed sequence of leniency rules:
//!
//! 1. a non-empty string that converts to a finite number counts as a number;
//! 2. against a string default, a number counts as a string;
//! 3. against a boolean default, `true`/`false`, `"true"`/`"false"` and
//!    anything that converts to 0 or 1 counts as a boolean;
//! 4. a string shaped like a W3C timestamp counts as a date.
//!
//! Numeric conversion of a non-numeric string yields NaN rather than an
//! error. Boolean conversion of a non-boolean-looking value is an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::core::classifier::Classify;
use crate::domain::model::{FieldValue, RealType};
use crate::utils::error::{HydrateError, Result};

/// W3C timestamp: `yyyy-mm-dd`, optionally followed by `Thh:ii:ss` or
/// ` hh:ii:ss` and any number of `+zz:zz` offsets.
static TIMESTAMP_W3C: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}((T| )[0-9]{2}:[0-9]{2}:[0-9]{2}([+-][0-9]{2}:[0-9]{2})*|)$")
        .expect("timestamp pattern is valid")
});

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("decimal pattern is valid")
});

// Largest magnitude, in milliseconds, a date may sit from the epoch.
const MAX_DATE_MILLIS: f64 = 8.64e15;

/// Decides whether `raw` can be hydrated into a field whose default is `target`.
pub fn is_compatible(target: &FieldValue, raw: &Value) -> bool {
    let target_type = target.real_type();
    let mut raw_type = raw.real_type();
    let mut stringified: Option<String> = None;

    if let Value::String(s) = raw {
        if !s.is_empty() && string_to_number(s).is_finite() {
            raw_type = RealType::Number;
        }
    }

    if target_type == RealType::String && raw_type == RealType::Number {
        stringified = Some(stringify(raw));
        raw_type = RealType::String;
    }

    if target_type == RealType::Boolean && looks_boolean(raw) {
        raw_type = RealType::Boolean;
    }

    if raw_type == RealType::String {
        let text = stringified.as_deref().or_else(|| raw.as_str());
        if text.is_some_and(is_timestamp_like) {
            raw_type = RealType::Date;
        }
    }

    target_type == raw_type
}

/// Casts `raw` to the kind of `target`. An absent raw value yields `target`
/// itself.
pub fn coerce(raw: Option<&Value>, target: &FieldValue) -> Result<FieldValue> {
    let Some(raw) = raw else {
        return Ok(target.clone());
    };

    match target.real_type() {
        RealType::String => Ok(FieldValue::String(stringify(raw))),
        RealType::Number => {
            let n = to_number(raw);
            if n.is_nan() {
                tracing::debug!("Numeric coercion of {} produced NaN", raw);
            }
            Ok(FieldValue::Number(n))
        }
        RealType::Boolean => coerce_bool(raw).map(FieldValue::Boolean),
        RealType::Date => Ok(FieldValue::Date(to_date(raw))),
        RealType::Array
        | RealType::Object
        | RealType::Null
        | RealType::Undefined => Ok(FieldValue::from(raw.clone())),
    }
}

fn coerce_bool(raw: &Value) -> Result<bool> {
    if !looks_boolean(raw) {
        return Err(HydrateError::Coercion {
            value: stringify(raw),
            target: RealType::Boolean.to_string(),
        });
    }
    Ok(match raw.as_str() {
        Some("true") => true,
        Some("false") => false,
        _ => {
            let n = to_number(raw);
            n != 0.0 && !n.is_nan()
        }
    })
}

/// True for booleans, the strings `"true"`/`"false"`, and values whose
/// numeric conversion is exactly 0 or 1.
pub fn looks_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::String(s) if s == "true" || s == "false" => true,
        other => {
            let n = to_number(other);
            n == 0.0 || n == 1.0
        }
    }
}

pub fn is_timestamp_like(text: &str) -> bool {
    TIMESTAMP_W3C.is_match(text)
}

/// Loose numeric conversion: null is 0, booleans are 0/1, strings are parsed
/// as numeric literals (blank is 0), arrays and objects go through their
/// string form. Anything unparseable is NaN.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(_) | Value::Object(_) => string_to_number(&stringify(value)),
    }
}

pub fn string_to_number(text: &str) -> f64 {
    let s = text.trim_matches(is_numeric_whitespace);
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }
    if DECIMAL_LITERAL.is_match(s) {
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

// Whitespace and line terminators a numeric string may be padded with.
fn is_numeric_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0b}' | '\u{0c}' | '\r' | ' ' | '\u{a0}' | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}' | '\u{2029}' | '\u{202f}' | '\u{205f}' | '\u{3000}' | '\u{feff}'
    )
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
    .unwrap_or(f64::NAN)
}

/// String form of a raw value: null is empty, arrays are comma-joined,
/// objects are opaque.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                format_number(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if n.fract() == 0.0 && abs < 1e21 {
        return format!("{:.0}", n);
    }
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }
    format!("{}", n)
}

/// Date construction: strings are parsed, numbers are epoch milliseconds,
/// null is the epoch. `None` is an invalid date.
pub fn to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Null | Value::Bool(_) | Value::Number(_) => {
            let millis = to_number(value);
            if millis.is_finite() && millis.abs() <= MAX_DATE_MILLIS {
                DateTime::from_timestamp_millis(millis.trunc() as i64)
            } else {
                None
            }
        }
        Value::Array(_) | Value::Object(_) => parse_date(&stringify(value)),
    }
}

/// Parses RFC 3339, the W3C timestamp shapes (date only, date and time with or
/// without an offset) and RFC 2822. Timestamps without an offset are read as
/// UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let s = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
