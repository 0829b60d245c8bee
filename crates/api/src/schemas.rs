//! Validation schemas, one per endpoint.

use crate::validation::{Check, FieldRule, Location, Schema};

const NON_EMPTY_STRING: &[Check] = &[Check::String, Check::NotEmpty];
const EMPLOYEE_ID_MESSAGE: &str = "Invalid employee ID format.";

pub struct SignupSchema;

impl Schema for SignupSchema {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required(Location::Body, "username", NON_EMPTY_STRING, "Username is required."),
        FieldRule::required(Location::Body, "email", &[Check::Email], "Email is not valid."),
        FieldRule::required(
            Location::Body,
            "password",
            &[Check::String, Check::MinLength(6)],
            "Password must be at least 6 characters long.",
        ),
    ];
}

pub struct LoginSchema;

impl Schema for LoginSchema {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required(Location::Body, "username", NON_EMPTY_STRING, "Username is required."),
        FieldRule::required(Location::Body, "password", &[Check::String, Check::MinLength(6)], "Password is required."),
    ];
}

pub struct CreateEmployeeSchema;

impl Schema for CreateEmployeeSchema {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required(Location::Body, "first_name", NON_EMPTY_STRING, "First name is required."),
        FieldRule::required(Location::Body, "last_name", NON_EMPTY_STRING, "Last name is required."),
        FieldRule::required(Location::Body, "email", &[Check::Email], "Email is not valid."),
        FieldRule::required(Location::Body, "position", NON_EMPTY_STRING, "Position is required."),
        FieldRule::required(Location::Body, "salary", &[Check::Numeric], "Salary must be a number."),
        FieldRule::required(
            Location::Body,
            "date_of_joining",
            &[Check::Iso8601],
            "Date of joining must be a valid date.",
        ),
        FieldRule::required(Location::Body, "department", NON_EMPTY_STRING, "Department is required."),
    ];
}

/// `{eid}` path parameter of the single-employee routes
pub struct EmployeeIdSchema;

impl Schema for EmployeeIdSchema {
    const RULES: &'static [FieldRule] =
        &[FieldRule::required(Location::Params, "eid", &[Check::ObjectId], EMPLOYEE_ID_MESSAGE)];
}

pub struct UpdateEmployeeSchema;

impl Schema for UpdateEmployeeSchema {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required(Location::Params, "eid", &[Check::ObjectId], EMPLOYEE_ID_MESSAGE),
        FieldRule::optional(
            Location::Body,
            "first_name",
            NON_EMPTY_STRING,
            "First name is required if provided.",
        ),
        FieldRule::optional(
            Location::Body,
            "last_name",
            NON_EMPTY_STRING,
            "Last name is required if provided.",
        ),
        FieldRule::optional(Location::Body, "email", &[Check::Email], "Email is not valid."),
        FieldRule::optional(
            Location::Body,
            "position",
            NON_EMPTY_STRING,
            "Position is required if provided.",
        ),
        FieldRule::optional(Location::Body, "salary", &[Check::Numeric], "Salary must be a number."),
        FieldRule::optional(
            Location::Body,
            "date_of_joining",
            &[Check::Iso8601],
            "Date of joining must be a valid date.",
        ),
        FieldRule::optional(
            Location::Body,
            "department",
            NON_EMPTY_STRING,
            "Department is required if provided.",
        ),
    ];
}

/// `?eid=` query parameter of the delete route
pub struct DeleteEmployeeSchema;

impl Schema for DeleteEmployeeSchema {
    const RULES: &'static [FieldRule] =
        &[FieldRule::required(Location::Query, "eid", &[Check::ObjectId], EMPLOYEE_ID_MESSAGE)];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{violations, RequestInput};
    use serde_json::json;

    #[test]
    fn test_empty_signup_reports_every_field() {
        let body = json!({});
        let messages: Vec<_> = violations::<SignupSchema>(&RequestInput::new().body(&body))
            .iter()
            .map(|v| v.message)
            .collect();
        assert_eq!(
            messages,
            [
                "Username is required.",
                "Email is not valid.",
                "Password must be at least 6 characters long."
            ]
        );
    }

    #[test]
    fn test_example_employee_is_valid() {
        let body = json!({
            "first_name": "A",
            "last_name": "B",
            "email": "a@b.com",
            "position": "Eng",
            "salary": 100000,
            "date_of_joining": "2024-01-01",
            "department": "R&D"
        });
        assert!(violations::<CreateEmployeeSchema>(&RequestInput::new().body(&body)).is_empty());
    }

    #[test]
    fn test_update_accepts_empty_body_but_checks_id() {
        let body = json!({});
        let ok = RequestInput::new().body(&body).param("eid", "507f1f77bcf86cd799439011");
        assert!(violations::<UpdateEmployeeSchema>(&ok).is_empty());

        let bad = RequestInput::new().body(&body).param("eid", "42");
        let found = violations::<UpdateEmployeeSchema>(&bad);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, EMPLOYEE_ID_MESSAGE);
    }

    #[test]
    fn test_update_rejects_blank_supplied_field() {
        let body = json!({ "first_name": "", "salary": "abc" });
        let input = RequestInput::new().body(&body).param("eid", "507f1f77bcf86cd799439011");
        let fields: Vec<_> = violations::<UpdateEmployeeSchema>(&input).iter().map(|v| v.field).collect();
        assert_eq!(fields, ["first_name", "salary"]);
    }
}
