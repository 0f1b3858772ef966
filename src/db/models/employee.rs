//! Employee models.
//!
//! `emp_id` is the business identifier used by assets and tickets, distinct
//! from the numeric row id.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: i64,
    pub username: String,
    #[serde(rename = "empId")]
    pub emp_id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub company: String,
    pub role: String,
    pub team: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Column values for an employee insert.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub username: String,
    pub emp_id: String,
    pub email: String,
    pub password_hash: String,
    pub company: String,
    pub role: String,
    pub team: String,
}

/// Full-row replace: every editable column is resupplied. The credential is
/// not editable through this path.
#[derive(Debug, Clone)]
pub struct EmployeeUpdate {
    pub username: String,
    pub emp_id: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub team: String,
}
