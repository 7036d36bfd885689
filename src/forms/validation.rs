// SPDX-License-Identifier: MIT

//! Field validation rules shared by every section form
//!
//! Each rule checks one value and records at most one message per field,
//! keeping the first failure, so a form's `validate` reads like its schema.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::ContactInfo;

pub const REQUIRED: &str = "Required";

static ARABIC_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\u{0600}-\u{06FF}0-9\s.,()\-]+$").expect("valid regex"));
static ENGLISH_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\s.,()\-]+$").expect("valid regex"));
static NUMERIC_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^966\d{9}$").expect("valid regex"));
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Earliest date any date field accepts
pub fn min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Field-level validation failures, keyed by the field's wire name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first message for a field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.fields.iter()
    }

    /// Fold nested errors under `prefix.` (e.g. `publicContact.email`)
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for (field, message) in other.fields {
            self.add(format!("{}.{}", prefix, field), message);
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

// --- Rules ---

pub fn required_str(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED);
        false
    } else {
        true
    }
}

/// Required, then must match `pattern`
pub fn matches(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    pattern: &Regex,
    message: &str,
) -> bool {
    if !required_str(errors, field, value) {
        return false;
    }
    if pattern.is_match(value) {
        true
    } else {
        errors.add(field, message);
        false
    }
}

pub fn arabic_text(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    matches(errors, field, value, &ARABIC_TEXT, "Arabic letters/numbers only")
}

pub fn english_text(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    matches(errors, field, value, &ENGLISH_TEXT, "English letters/numbers only")
}

pub fn numbers_only(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    matches(errors, field, value, &NUMERIC_ONLY, "Numbers only")
}

pub fn phone(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    matches(
        errors,
        field,
        value,
        &PHONE,
        "Must start with 966 and contain 9 digits",
    )
}

pub fn email(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if EMAIL.is_match(value.trim()) {
        true
    } else {
        errors.add(field, "Invalid email");
        false
    }
}

/// Required absolute http(s) URL
pub fn website(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "Website is required");
        return false;
    }
    if is_http_url(value) {
        true
    } else {
        errors.add(field, "Invalid URL");
        false
    }
}

pub fn is_http_url(value: &str) -> bool {
    url::Url::parse(value.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}

/// Lookup or enum value: must be present and at least 1
pub fn required_number(errors: &mut ValidationErrors, field: &str, value: Option<i64>) -> bool {
    match value {
        Some(v) if v >= 1 => true,
        _ => {
            errors.add(field, REQUIRED);
            false
        }
    }
}

/// Positive integer whose message names the field
pub fn positive_integer(errors: &mut ValidationErrors, field: &str, value: Option<i64>) -> bool {
    match value {
        Some(v) if v > 0 => true,
        _ => {
            errors.add(field, format!("{} is required", field));
            false
        }
    }
}

/// Present, not before 1900-01-01 and not in the future
pub fn valid_date(errors: &mut ValidationErrors, field: &str, value: Option<NaiveDate>) -> bool {
    match value {
        None => {
            errors.add(field, REQUIRED);
            false
        }
        Some(d) if d < min_date() => {
            errors.add(field, "Date is too early");
            false
        }
        Some(d) if d > Local::now().date_naive() => {
            errors.add(field, "Date cannot be in the future");
            false
        }
        Some(_) => true,
    }
}

pub fn contact_info(errors: &mut ValidationErrors, field: &str, contact: &ContactInfo) {
    let mut nested = ValidationErrors::new();
    required_str(&mut nested, "fullName", &contact.full_name);
    phone(&mut nested, "phoneNumber", &contact.phone_number);
    email(&mut nested, "email", &contact.email);
    errors.merge_prefixed(field, nested);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Required");
        errors.add("name", "Too long");
        assert_eq!(errors.get("name"), Some("Required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_phone_rule() {
        let mut errors = ValidationErrors::new();
        assert!(phone(&mut errors, "tel", "966501234567"));
        assert!(!phone(&mut errors, "bad", "0501234567"));
        assert_eq!(
            errors.get("bad"),
            Some("Must start with 966 and contain 9 digits")
        );
    }

    #[test]
    fn test_phone_empty_is_required() {
        let mut errors = ValidationErrors::new();
        assert!(!phone(&mut errors, "tel", ""));
        assert_eq!(errors.get("tel"), Some(REQUIRED));
    }

    #[test]
    fn test_text_scripts() {
        let mut errors = ValidationErrors::new();
        assert!(english_text(&mut errors, "en", "Phase II trial (2024)"));
        assert!(arabic_text(&mut errors, "ar", "دراسة سريرية 2"));
        assert!(!english_text(&mut errors, "en2", "دراسة"));
        assert!(!arabic_text(&mut errors, "ar2", "Study"));
        assert!(errors.has("en2"));
        assert!(errors.has("ar2"));
    }

    #[test]
    fn test_website_rule() {
        let mut errors = ValidationErrors::new();
        assert!(website(&mut errors, "a", "https://example.com"));
        assert!(!website(&mut errors, "b", ""));
        assert!(!website(&mut errors, "c", "ftp://example.com"));
        assert!(!website(&mut errors, "d", "example.com"));
        assert_eq!(errors.get("b"), Some("Website is required"));
        assert_eq!(errors.get("c"), Some("Invalid URL"));
    }

    #[test]
    fn test_valid_date_bounds() {
        let mut errors = ValidationErrors::new();
        let old = NaiveDate::from_ymd_opt(1850, 1, 1);
        let future = Local::now().date_naive().succ_opt();
        let ok = NaiveDate::from_ymd_opt(2020, 5, 1);

        assert!(!valid_date(&mut errors, "old", old));
        assert!(!valid_date(&mut errors, "future", future));
        assert!(valid_date(&mut errors, "ok", ok));
        assert!(!valid_date(&mut errors, "missing", None));
        assert_eq!(errors.get("missing"), Some(REQUIRED));
    }

    #[test]
    fn test_required_number_rejects_zero() {
        let mut errors = ValidationErrors::new();
        assert!(!required_number(&mut errors, "status", Some(0)));
        assert!(required_number(&mut errors, "other", Some(3)));
    }

    #[test]
    fn test_contact_info_prefixes_fields() {
        let mut errors = ValidationErrors::new();
        contact_info(&mut errors, "publicContact", &ContactInfo::default());
        assert!(errors.has("publicContact.fullName"));
        assert!(errors.has("publicContact.phoneNumber"));
        assert!(errors.has("publicContact.email"));
    }

    #[test]
    fn test_display_joins_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("b", "two");
        errors.add("a", "one");
        assert_eq!(errors.to_string(), "a: one; b: two");
    }
}
