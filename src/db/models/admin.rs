//! Admin user model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in the `users` table. Admins authenticate against this table and
/// receive ticket notifications.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub company: String,
    pub email: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
