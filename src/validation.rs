//! Form input handling.
//!
//! Submissions go through two layers before reaching a service: a
//! presentation-sanitization step (trim, HTML-escape, blank optionals become
//! `None`) and a structural check driven by `validator` derive rules on the
//! sanitized form. Conversion into typed records (ids, dates, enums) happens
//! afterwards in each form's own `to_*` method.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

/// Letters and digits only, at least one character
pub static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z]+$").expect("alphanumeric pattern is valid"));

/// One message shown next to a form after a failed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormError {
    pub param: String,
    pub msg: String,
}

impl FormError {
    pub fn new(param: &str, msg: &str) -> Self {
        Self {
            param: param.to_string(),
            msg: msg.to_string(),
        }
    }
}

/// Escape markup-significant characters
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            c => out.push(c),
        }
    }
    out
}

/// Trim then escape a required text field
pub fn clean(value: &str) -> String {
    escape(value.trim())
}

/// Trim then escape an optional field; blank input counts as absent
pub fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(escape)
}

/// Run the derive rules of `form` and flatten the failures into messages.
///
/// `fields` fixes the order of the messages so that re-rendered forms list
/// errors top to bottom.
pub fn check<F: Validate>(form: &F, fields: &[&str]) -> Vec<FormError> {
    match form.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => collect(&errors, fields),
    }
}

fn collect(errors: &ValidationErrors, fields: &[&str]) -> Vec<FormError> {
    let by_field = errors.field_errors();
    let mut out = Vec::new();
    for field in fields {
        if let Some(field_errors) = by_field.get(*field) {
            for error in field_errors.iter() {
                let msg = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                out.push(FormError {
                    param: field.to_string(),
                    msg,
                });
            }
        }
    }
    out
}

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse an ISO-8601 calendar date or date-time, keeping the date part.
///
/// Reduced precision is accepted: `1564` is Jan 1 and `1564-04` is Apr 1.
/// Basic format (`15640423`) and numeric offsets without a colon parse too.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if value.len() >= 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        return match value.len() {
            4 => NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1),
            8 => NaiveDate::from_ymd_opt(
                value[..4].parse().ok()?,
                value[4..6].parse().ok()?,
                value[6..].parse().ok()?,
            ),
            _ => None,
        };
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if value.len() == 7 {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d") {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date_naive())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse an optional date field, recording `msg` under `param` on failure
pub fn parse_optional_date(
    value: Option<&str>,
    param: &str,
    msg: &str,
    errors: &mut Vec<FormError>,
) -> Option<NaiveDate> {
    let value = value?;
    let parsed = parse_iso_date(value);
    if parsed.is_none() {
        errors.push(FormError::new(param, msg));
    }
    parsed
}

/// Parse a record id submitted through a select or checkbox
pub fn parse_id(value: &str) -> Option<i32> {
    value.parse::<i32>().ok().filter(|id| *id > 0)
}
