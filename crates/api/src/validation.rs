//! Declarative request validation.
//!
//! Each endpoint owns a [`Schema`]: an ordered table of [`FieldRule`]s. The
//! generic [`validate`] runs every rule against the request and reports one
//! [`Violation`] per failing field, in the order the rules are declared.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use hrkit_storage::RecordId;
use serde::Serialize;
use serde_json::Value;
use validator::ValidateEmail;

use crate::error::ApiError;

/// Part of the request a field is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Params,
    Query,
}

/// A single format check applied to a present value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    String,
    NotEmpty,
    Numeric,
    Email,
    Iso8601,
    ObjectId,
    MinLength(usize),
}

impl Check {
    pub fn passes(&self, value: &Value) -> bool {
        match self {
            Check::String => value.is_string(),
            Check::NotEmpty => !as_text(value).is_empty(),
            Check::Numeric => is_numeric(value),
            Check::Email => value.as_str().is_some_and(|s| s.validate_email()),
            Check::Iso8601 => value.as_str().is_some_and(is_iso8601),
            Check::ObjectId => value.as_str().is_some_and(RecordId::is_valid),
            Check::MinLength(min) => as_text(value).chars().count() >= *min,
        }
    }
}

/// Rules for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub location: Location,
    /// Optional fields are skipped when absent and fully checked when present
    pub optional: bool,
    pub checks: &'static [Check],
    pub message: &'static str,
}

impl FieldRule {
    pub const fn required(
        location: Location,
        field: &'static str,
        checks: &'static [Check],
        message: &'static str,
    ) -> Self {
        Self {
            field,
            location,
            optional: false,
            checks,
            message,
        }
    }

    pub const fn optional(
        location: Location,
        field: &'static str,
        checks: &'static [Check],
        message: &'static str,
    ) -> Self {
        Self {
            field,
            location,
            optional: true,
            checks,
            message,
        }
    }

    fn check(&self, input: &RequestInput<'_>) -> Option<Violation> {
        let failed = match input.lookup(self.location, self.field) {
            None => !self.optional,
            Some(value) => self.checks.iter().any(|check| !check.passes(&value)),
        };
        failed.then(|| Violation {
            field: self.field,
            location: self.location,
            message: self.message,
        })
    }
}

/// Validation rules of one endpoint
pub trait Schema {
    const RULES: &'static [FieldRule];
}

/// One failed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub location: Location,
    pub message: &'static str,
}

/// The parts of a request the rules can look at
#[derive(Debug, Default)]
pub struct RequestInput<'a> {
    body: Option<&'a Value>,
    params: Vec<(&'static str, &'a str)>,
    query: Option<&'a HashMap<String, String>>,
}

impl<'a> RequestInput<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: &'a Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn param(mut self, name: &'static str, value: &'a str) -> Self {
        self.params.push((name, value));
        self
    }

    pub fn query(mut self, query: &'a HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    fn lookup(&self, location: Location, field: &str) -> Option<Cow<'a, Value>> {
        match location {
            Location::Body => self.body.and_then(|body| body.get(field)).map(Cow::Borrowed),
            Location::Params => self
                .params
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, value)| Cow::Owned(Value::String(value.to_string()))),
            Location::Query => self
                .query
                .and_then(|query| query.get(field))
                .map(|value| Cow::Owned(Value::String(value.clone()))),
        }
    }
}

/// Run every rule of `S`; all violations are returned, in declaration order
pub fn violations<S: Schema>(input: &RequestInput<'_>) -> Vec<Violation> {
    S::RULES.iter().filter_map(|rule| rule.check(input)).collect()
}

/// Reject the request with 400 when any rule of `S` fails
pub fn validate<S: Schema>(input: &RequestInput<'_>) -> Result<(), ApiError> {
    let violations = violations::<S>(input);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(violations))
    }
}

/// String form used by the length and emptiness checks
fn as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// JSON numbers, or strings made of an optional sign, digits and at most one dot
fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
            let (whole, fraction) = match digits.split_once('.') {
                Some((whole, fraction)) => (whole, Some(fraction)),
                None => (digits, None),
            };
            let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
            match fraction {
                Some(fraction) => !fraction.is_empty() && all_digits(whole) && all_digits(fraction),
                None => !whole.is_empty() && all_digits(whole),
            }
        }
        _ => false,
    }
}

/// Calendar dates (`2024-01-01`) and date-times with or without an offset
fn is_iso8601(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Sample;

    impl Schema for Sample {
        const RULES: &'static [FieldRule] = &[
            FieldRule::required(Location::Body, "name", &[Check::String, Check::NotEmpty], "Name is required."),
            FieldRule::required(Location::Body, "email", &[Check::Email], "Email is not valid."),
            FieldRule::optional(Location::Body, "salary", &[Check::Numeric], "Salary must be a number."),
            FieldRule::required(Location::Params, "id", &[Check::ObjectId], "Invalid ID format."),
        ];
    }

    #[test]
    fn test_valid_input_passes() {
        let body = json!({ "name": "Ada", "email": "ada@example.com" });
        let input = RequestInput::new().body(&body).param("id", "507f1f77bcf86cd799439011");
        assert!(violations::<Sample>(&input).is_empty());
    }

    #[test]
    fn test_every_failure_reported_in_declaration_order() {
        let body = json!({ "email": "nope", "salary": "ten" });
        let input = RequestInput::new().body(&body).param("id", "xyz");

        let fields: Vec<_> = violations::<Sample>(&input).iter().map(|v| v.field).collect();
        assert_eq!(fields, ["name", "email", "salary", "id"]);
    }

    #[test]
    fn test_optional_field_only_checked_when_present() {
        let body = json!({ "name": "Ada", "email": "ada@example.com", "salary": "12.5" });
        let input = RequestInput::new().body(&body).param("id", "507f1f77bcf86cd799439011");
        assert!(validate::<Sample>(&input).is_ok());
    }

    #[test]
    fn test_violation_shape() {
        let body = json!({ "name": "", "email": "ada@example.com" });
        let input = RequestInput::new().body(&body).param("id", "507f1f77bcf86cd799439011");

        let violations = violations::<Sample>(&input);
        assert_eq!(
            serde_json::to_value(&violations).unwrap(),
            json!([{ "field": "name", "location": "body", "message": "Name is required." }])
        );
    }

    #[test]
    fn test_query_location() {
        struct ById;
        impl Schema for ById {
            const RULES: &'static [FieldRule] =
                &[FieldRule::required(Location::Query, "eid", &[Check::ObjectId], "bad id")];
        }

        let mut query = HashMap::new();
        assert_eq!(violations::<ById>(&RequestInput::new().query(&query)).len(), 1);

        query.insert("eid".to_string(), "507f1f77bcf86cd799439011".to_string());
        assert!(violations::<ById>(&RequestInput::new().query(&query)).is_empty());
    }

    #[test]
    fn test_numeric() {
        for ok in [json!(1), json!(2.5), json!("100000"), json!("-3"), json!("+0.5"), json!(".5")] {
            assert!(Check::Numeric.passes(&ok), "{ok}");
        }
        for bad in [json!("abc"), json!(""), json!("1."), json!("1e5"), json!(true), json!(null)] {
            assert!(!Check::Numeric.passes(&bad), "{bad}");
        }
    }

    #[test]
    fn test_iso8601() {
        for ok in ["2024-01-01", "2024-01-01T09:30:00Z", "2024-01-01T09:30:00.123+02:00", "2024-01-01T09:30"] {
            assert!(Check::Iso8601.passes(&json!(ok)), "{ok}");
        }
        for bad in ["2024-13-01", "01/01/2024", "yesterday", ""] {
            assert!(!Check::Iso8601.passes(&json!(bad)), "{bad}");
        }
        assert!(!Check::Iso8601.passes(&json!(20240101)));
    }

    #[test]
    fn test_min_length_and_email() {
        assert!(Check::MinLength(6).passes(&json!("secret")));
        assert!(!Check::MinLength(6).passes(&json!("short")));
        assert!(!Check::MinLength(6).passes(&json!(null)));

        assert!(Check::Email.passes(&json!("a@b.com")));
        assert!(!Check::Email.passes(&json!("a@")));
        assert!(!Check::Email.passes(&json!(42)));
    }
}
