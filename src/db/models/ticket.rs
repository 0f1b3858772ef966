//! Support ticket model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    #[serde(rename = "empId")]
    pub emp_id: String,
    #[serde(rename = "serialNo")]
    pub serial_no: String,
    pub description: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
