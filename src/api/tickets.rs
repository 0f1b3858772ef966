//! Support ticket endpoints.
//!
//! Ticket creation is the one place the service fans out: after the row is
//! committed, confirmation and alert emails are attempted. Their outcome
//! only changes the response message, never the success flag.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::employees::MutationResponse;
use super::error::ApiError;
use super::validation::{normalized, FieldCheck};
use crate::db::{queries, StoreError, Ticket};
use crate::notifications::{self, TicketNotice};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TicketsResponse {
    pub success: bool,
    pub tickets: Vec<Ticket>,
}

/// GET /api/tickets, unscoped: tickets carry no company column.
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TicketsResponse>, ApiError> {
    let tickets = queries::list_tickets(&state.db).await?;
    Ok(Json(TicketsResponse {
        success: true,
        tickets,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    #[serde(rename = "empId")]
    pub emp_id: Option<String>,
    #[serde(rename = "serialNo")]
    pub serial_no: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTicketResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "ticketId")]
    pub ticket_id: i64,
}

/// POST /api/tickets
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<CreateTicketResponse>), ApiError> {
    let mut fields = FieldCheck::new();
    let emp_id = fields.require("empId", req.emp_id);
    let serial_no = fields.require("serialNo", req.serial_no);
    let description = fields.require("description", req.description);
    fields.finish()?;

    let status = normalized(req.status).unwrap_or_else(|| "Open".to_string());

    // The insert is the operation; everything after it is best-effort.
    let ticket_id = queries::insert_ticket(&state.db, &emp_id, &serial_no, &description, &status)
        .await
        .map_err(ApiError::from)?;

    let notice = TicketNotice {
        ticket_id,
        emp_id,
        serial_no,
        description,
        status,
    };
    let delivered = notifications::notify_ticket_created(&state.db, &state.mailer, &notice).await;

    let message = if delivered {
        "Ticket created successfully and emails sent"
    } else {
        "Ticket created but failed to send email"
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateTicketResponse {
            success: true,
            message: message.to_string(),
            ticket_id,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketRequest {
    pub status: Option<String>,
}

/// PUT /api/tickets/:id, status is the only mutable column.
pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTicketRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let mut fields = FieldCheck::new();
    let status = fields.require("status", req.status);
    fields.finish()?;

    queries::update_ticket_status(&state.db, id, &status)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::not_found("Ticket not found"),
            other => other.into(),
        })?;

    Ok(Json(MutationResponse {
        success: true,
        message: "Ticket updated successfully".to_string(),
    }))
}
