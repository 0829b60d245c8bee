use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hrkit_storage::{Employee, EmployeeUpdate};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult, MessageResponse},
    extract::JsonBody,
    schemas::{CreateEmployeeSchema, DeleteEmployeeSchema, EmployeeIdSchema, UpdateEmployeeSchema},
    validation::{validate, RequestInput},
    AppState,
};

/// Employee as returned to clients, with the id in hex form
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    #[serde(serialize_with = "serialize_salary")]
    pub salary: f64,
    pub date_of_joining: String,
    pub department: String,
}

/// Whole amounts go out as integers, so `100000` is echoed as `100000`
fn serialize_salary<S: Serializer>(salary: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if salary.fract() == 0.0 && salary.abs() <= MAX_EXACT {
        serializer.serialize_i64(*salary as i64)
    } else {
        serializer.serialize_f64(*salary)
    }
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id.map(|id| id.to_hex()),
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            position: employee.position,
            salary: employee.salary,
            date_of_joining: employee.date_of_joining,
            department: employee.department,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub employee_id: String,
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

/// GET /api/v1/emp/employees - List every employee
pub async fn list_employees(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let employees: Vec<EmployeeResponse> = state
        .employee_service
        .list()
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok((StatusCode::OK, Json(employees)))
}

/// POST /api/v1/emp/employees - Create an employee
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    validate::<CreateEmployeeSchema>(&RequestInput::new().body(&body.0))?;
    let employee: Employee = body.parse()?;

    let id = state.employee_service.create(employee).await?;

    let response = CreatedResponse {
        message: "Employee created successfully",
        employee_id: id.to_hex(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/emp/employees/{eid} - Fetch one employee
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(eid): Path<String>,
) -> ApiResult<impl IntoResponse> {
    validate::<EmployeeIdSchema>(&RequestInput::new().param("eid", &eid))?;

    let employee = state
        .employee_service
        .get(&eid)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    Ok((StatusCode::OK, Json(EmployeeResponse::from(employee))))
}

/// PUT /api/v1/emp/employees/{eid} - Update the supplied fields of an employee
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(eid): Path<String>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    validate::<UpdateEmployeeSchema>(&RequestInput::new().body(&body.0).param("eid", &eid))?;
    let changes: EmployeeUpdate = body.parse()?;

    state
        .employee_service
        .update(&eid, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    Ok((StatusCode::OK, message("Employee details updated successfully.")))
}

/// DELETE /api/v1/emp/employees?eid= - Delete an employee
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    validate::<DeleteEmployeeSchema>(&RequestInput::new().query(&query))?;
    let eid = query.get("eid").map(String::as_str).unwrap_or_default();

    if !state.employee_service.delete(eid).await? {
        return Err(ApiError::not_found("Employee not found."));
    }

    Ok((StatusCode::OK, message("Employee deleted successfully.")))
}
