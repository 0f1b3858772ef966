//! Employee management endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use super::resolve_scope;
use super::validation::FieldCheck;
use crate::db::{queries, Employee, EmployeeUpdate, StoreError};
use crate::token::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct EmployeesResponse {
    pub success: bool,
    pub employees: Vec<Employee>,
}

/// GET /api/employees (bearer)
///
/// Rows are scoped to the caller's company unless the token carries the
/// admin role.
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<EmployeesResponse>, ApiError> {
    let scope = resolve_scope(
        claims.role == "admin",
        Some(claims.company),
        state.config.auth.allow_unscoped_lists,
    )?;

    let employees = queries::list_employees(&state.db, &scope).await?;
    Ok(Json(EmployeesResponse {
        success: true,
        employees,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub username: Option<String>,
    #[serde(rename = "empId")]
    pub emp_id: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

/// PUT /api/employees/:id, full-row replace: every field resupplied.
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let mut fields = FieldCheck::new();
    let username = fields.require("username", req.username);
    let emp_id = fields.require("empId", req.emp_id);
    let email = fields.require("email", req.email);
    let company = fields.require("company", req.company);
    let role = fields.require("role", req.role);
    let team = fields.require("team", req.team);
    fields.finish()?;

    let update = EmployeeUpdate {
        username,
        emp_id,
        email,
        company,
        role,
        team,
    };

    queries::update_employee(&state.db, id, &update)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::not_found("Employee not found"),
            StoreError::Duplicate => ApiError::duplicate("Username or email already exists"),
            other => other.into(),
        })?;

    Ok(Json(MutationResponse {
        success: true,
        message: "Employee updated successfully".to_string(),
    }))
}

/// DELETE /api/employees/:id
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MutationResponse>, ApiError> {
    queries::delete_employee(&state.db, id)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::not_found("Employee not found"),
            other => other.into(),
        })?;

    Ok(Json(MutationResponse {
        success: true,
        message: "Employee deleted successfully".to_string(),
    }))
}
