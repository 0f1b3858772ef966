//! Asset management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::employees::MutationResponse;
use super::error::ApiError;
use super::resolve_scope;
use super::validation::{normalized, FieldCheck};
use crate::db::{queries, AssetRow, NewAsset, StoreError};
use crate::token::Claims;
use crate::AppState;

/// Create/update payload. Only name, tagNo and company are required;
/// everything else normalizes to NULL or a documented default.
#[derive(Debug, Deserialize)]
pub struct AssetPayload {
    pub name: Option<String>,
    #[serde(rename = "tagNo")]
    pub tag_no: Option<String>,
    pub company: Option<String>,
    pub team: Option<String>,
    #[serde(rename = "mobileNumber")]
    pub mobile_number: Option<String>,
    pub os: Option<String>,
    pub model: Option<String>,
    pub ram: Option<String>,
    pub drive: Option<String>,
    #[serde(rename = "serialNumber")]
    pub serial_number: Option<String>,
    pub condition: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "purchaseDate")]
    pub purchase_date: Option<String>,
    pub peripherals: Option<Vec<String>>,
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,
}

impl AssetPayload {
    /// Validate the required trio and shape the row values. Peripherals are
    /// serialized to their stored JSON form, defaulting to an empty list.
    fn into_new_asset(self) -> Result<NewAsset, ApiError> {
        let mut fields = FieldCheck::new();
        let name = fields.require("name", self.name);
        let tag_no = fields.require("tagNo", self.tag_no);
        let company = fields.require("company", self.company);
        fields.finish()?;

        let peripherals = serde_json::to_string(&self.peripherals.unwrap_or_default())
            .unwrap_or_else(|_| "[]".to_string());

        Ok(NewAsset {
            name,
            tag_no,
            company,
            team: normalized(self.team),
            mobile_number: normalized(self.mobile_number),
            os: normalized(self.os),
            model: normalized(self.model),
            ram: normalized(self.ram),
            drive: normalized(self.drive),
            serial_number: normalized(self.serial_number),
            issue_condition: normalized(self.condition),
            status: normalized(self.status).unwrap_or_else(|| "In Stock".to_string()),
            purchase_date: normalized(self.purchase_date),
            peripherals,
            assigned_emp_id: normalized(self.assigned_to),
        })
    }
}

/// Asset as the frontend sees it: the assignment reference exposed as
/// `assignedTo` and peripherals always an ordered list, never null or a raw
/// string.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetView {
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
    pub peripherals: Vec<String>,
    pub assigned_to: Option<String>,
    pub created_at: String,
}

impl From<AssetRow> for AssetView {
    fn from(row: AssetRow) -> Self {
        // Unparsable stored values degrade to an empty list.
        let peripherals = serde_json::from_str(&row.peripherals).unwrap_or_default();
        Self {
            id: row.id,
            name: row.name,
            tag_no: row.tag_no,
            company: row.company,
            team: row.team,
            mobile_number: row.mobile_number,
            os: row.os,
            model: row.model,
            ram: row.ram,
            drive: row.drive,
            serial_number: row.serial_number,
            issue_condition: row.issue_condition,
            status: row.status,
            purchase_date: row.purchase_date,
            peripherals,
            assigned_to: row.assigned_emp_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssetsResponse {
    pub success: bool,
    pub assets: Vec<AssetView>,
}

/// GET /api/assets (bearer)
pub async fn list_assets(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AssetsResponse>, ApiError> {
    let scope = resolve_scope(
        claims.role == "admin",
        Some(claims.company),
        state.config.auth.allow_unscoped_lists,
    )?;

    let assets = queries::list_assets(&state.db, &scope)
        .await?
        .into_iter()
        .map(AssetView::from)
        .collect();

    Ok(Json(AssetsResponse {
        success: true,
        assets,
    }))
}

#[derive(Debug, Serialize)]
pub struct CreateAssetResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "assetId")]
    pub asset_id: i64,
}

/// POST /api/assets
pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssetPayload>,
) -> Result<(StatusCode, Json<CreateAssetResponse>), ApiError> {
    let asset = req.into_new_asset()?;

    let asset_id = queries::insert_asset(&state.db, &asset)
        .await
        .map_err(|err| match err {
            StoreError::Duplicate => ApiError::duplicate("Tag number already exists"),
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAssetResponse {
            success: true,
            message: "Asset added successfully".to_string(),
            asset_id,
        }),
    ))
}

/// PUT /api/assets/:id, full-row replace.
pub async fn update_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AssetPayload>,
) -> Result<Json<MutationResponse>, ApiError> {
    let asset = req.into_new_asset()?;

    queries::update_asset(&state.db, id, &asset)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::not_found("Asset not found"),
            StoreError::Duplicate => ApiError::duplicate("Tag number already exists"),
            other => other.into(),
        })?;

    Ok(Json(MutationResponse {
        success: true,
        message: "Asset updated successfully".to_string(),
    }))
}

/// DELETE /api/assets/:id
pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MutationResponse>, ApiError> {
    queries::delete_asset(&state.db, id)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::not_found("Asset not found"),
            other => other.into(),
        })?;

    Ok(Json(MutationResponse {
        success: true,
        message: "Asset deleted successfully".to_string(),
    }))
}
