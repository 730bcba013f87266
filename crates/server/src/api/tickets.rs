//! Ticket API handlers.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ticketdesk_core::{CreateTicketRequest, Ticket, TicketError};
use tracing::error;

use crate::metrics::{TICKETS_CREATED_TOTAL, TICKETS_DELETED_TOTAL};
use crate::state::AppState;

/// Detail message returned for unknown ticket ids
const NOT_FOUND_DETAIL: &str = "Ticket not found";

/// Detail message returned when the ticket store fails; the cause is only logged
const INTERNAL_ERROR_DETAIL: &str = "Internal storage error";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for creating a ticket
#[derive(Debug, Deserialize)]
pub struct CreateTicketParams {
    pub title: String,
    pub description: String,
}

/// Response for ticket operations
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: String,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            status: ticket.status,
            created_at: ticket.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// Response for a successful delete
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

fn store_error(err: TicketError) -> ApiError {
    match err {
        TicketError::NotFound(_) => api_error(StatusCode::NOT_FOUND, NOT_FOUND_DETAIL),
        other => {
            error!("Ticket store failure: {}", other);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_DETAIL)
        }
    }
}

/// Resolve the `{id}` path segment.
///
/// Negative integers are valid ids that simply never exist, so they answer
/// 404 like any other unknown id; anything non-numeric is a 422.
fn ticket_id(path: Result<Path<String>, PathRejection>) -> Result<u64, ApiError> {
    let Path(raw) = path
        .map_err(|rejection| api_error(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()))?;

    if let Ok(id) = raw.parse::<u64>() {
        return Ok(id);
    }

    let is_negative_integer = raw
        .strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
    if is_negative_integer {
        return Err(api_error(StatusCode::NOT_FOUND, NOT_FOUND_DETAIL));
    }

    Err(api_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("Invalid ticket id `{}`: expected an integer", raw),
    ))
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new ticket from `title` and `description` query parameters
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CreateTicketParams>, QueryRejection>,
) -> Result<Json<TicketResponse>, ApiError> {
    let Query(params) = params
        .map_err(|rejection| api_error(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()))?;

    let ticket = state
        .ticket_store()
        .create(CreateTicketRequest::new(params.title, params.description))
        .map_err(store_error)?;
    TICKETS_CREATED_TOTAL.inc();

    Ok(Json(TicketResponse::from(ticket)))
}

/// Get a ticket by ID
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<TicketResponse>, ApiError> {
    let id = ticket_id(path)?;
    let ticket = state.ticket_store().get(id).map_err(store_error)?;
    Ok(Json(TicketResponse::from(ticket)))
}

/// List every ticket in insertion order
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TicketResponse>>, ApiError> {
    let tickets = state.ticket_store().list().map_err(store_error)?;
    Ok(Json(tickets.into_iter().map(TicketResponse::from).collect()))
}

/// Delete a ticket
pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = ticket_id(path)?;
    state.ticket_store().delete(id).map_err(store_error)?;
    TICKETS_DELETED_TOTAL.inc();

    Ok(Json(MessageResponse {
        message: "Ticket deleted".to_string(),
    }))
}
