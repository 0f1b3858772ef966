//! Asset models.

use sqlx::FromRow;

/// Row in the `assets` table. `peripherals` is stored as a JSON array in a
/// TEXT column; the API layer deserializes it before responding.
#[derive(Debug, Clone, FromRow)]
pub struct AssetRow {
    pub id: i64,
    pub name: String,
    pub tag_no: String,
    pub company: String,
    pub team: Option<String>,
    pub mobile_number: Option<String>,
    pub os: Option<String>,
    pub model: Option<String>,
    pub ram: Option<String>,
    pub drive: Option<String>,
    pub serial_number: Option<String>,
    pub issue_condition: Option<String>,
    pub status: String,
    pub purchase_date: Option<String>,
    pub peripherals: String,
    pub assigned_emp_id: Option<String>,
    pub created_at: String,
}

/// Column values for an asset insert or full-row update. `peripherals` is
/// already serialized to its stored JSON form.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub name: String,
    pub tag_no: String,
    pub company: String,
    pub team: Option<String>,
    pub mobile_number: Option<String>,
    pub os: Option<String>,
    pub model: Option<String>,
    pub ram: Option<String>,
    pub drive: Option<String>,
    pub serial_number: Option<String>,
    pub issue_condition: Option<String>,
    pub status: String,
    pub purchase_date: Option<String>,
    pub peripherals: String,
    pub assigned_emp_id: Option<String>,
}
