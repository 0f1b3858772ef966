//! Combined user directory: employee onboarding and the normalized
//! admin+employee listing consumed by the frontend user table.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use super::resolve_scope;
use super::validation::FieldCheck;
use crate::db::{queries, NewEmployee, StoreError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub username: Option<String>,
    #[serde(rename = "empId")]
    pub emp_id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateEmployeeResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// POST /api/users
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<CreateEmployeeResponse>), ApiError> {
    let mut fields = FieldCheck::new();
    let username = fields.require("username", req.username);
    let emp_id = fields.require("empId", req.emp_id);
    let email = fields.require("email", req.email);
    let password = fields.require("password", req.password);
    let company = fields.require("company", req.company);
    let role = fields.require("role", req.role);
    let team = fields.require("team", req.team);
    fields.finish()?;

    let password_hash = super::auth::hash_password(&password).map_err(|err| {
        tracing::error!(error = %err, "failed to hash password");
        ApiError::internal("Failed to hash password")
    })?;

    let employee = NewEmployee {
        username,
        emp_id,
        email,
        password_hash,
        company,
        role,
        team,
    };

    let user_id = queries::insert_employee(&state.db, &employee)
        .await
        .map_err(|err| match err {
            StoreError::Duplicate => ApiError::duplicate("Username or email already exists"),
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreateEmployeeResponse {
            success: true,
            message: "Employee added successfully".to_string(),
            user_id,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub company: Option<String>,
    pub role: Option<String>,
}

/// One row of the combined listing. Admins have no business identifier or
/// team, so those normalize to the username and null.
#[derive(Debug, Serialize)]
pub struct NormalizedUser {
    pub id: i64,
    pub username: String,
    #[serde(rename = "empId")]
    pub emp_id: String,
    pub email: Option<String>,
    pub company: String,
    pub role: String,
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<NormalizedUser>,
}

/// GET /api/users?company=&role=
///
/// Scoping here is driven by query parameters, not by a token; a property
/// of the original frontend contract.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<UsersResponse>, ApiError> {
    let is_admin = query.role.as_deref() == Some("admin");
    let scope = resolve_scope(
        is_admin,
        query.company,
        state.config.auth.allow_unscoped_lists,
    )?;

    let admins = queries::list_admins(&state.db, &scope).await?;
    let employees = queries::list_employees(&state.db, &scope).await?;

    let users = admins
        .into_iter()
        .map(|admin| NormalizedUser {
            id: admin.id,
            emp_id: admin.username.clone(),
            username: admin.username,
            email: admin.email,
            company: admin.company,
            role: admin.role,
            team: None,
        })
        .chain(employees.into_iter().map(|employee| NormalizedUser {
            id: employee.id,
            username: employee.username,
            emp_id: employee.emp_id,
            email: Some(employee.email),
            company: employee.company,
            role: employee.role,
            team: Some(employee.team),
        }))
        .collect();

    Ok(Json(UsersResponse {
        success: true,
        users,
    }))
}
