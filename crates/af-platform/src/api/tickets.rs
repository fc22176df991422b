//! Support Ticket Endpoints
//!
//! Conversations update live over SSE: subscribers get a small change event
//! per message and refetch the thread. Internal notes never reach applicant
//! subscribers.

use std::convert::Infallible;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use utoipa::ToSchema;

use crate::domain::{SupportTicket, TicketMessage, TicketPriority, TicketStatus};
use crate::error::{PortalError, Result};
use crate::service::OpenTicket;

use super::common::{PaginatedResponse, PaginationParams};
use super::middleware::{AppState, Authenticated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: String,
    pub ticket_number: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    pub subject: String,
    pub priority: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SupportTicket> for TicketResponse {
    fn from(ticket: SupportTicket) -> Self {
        Self {
            id: ticket.id,
            ticket_number: ticket.ticket_number,
            student_id: ticket.student_id,
            application_id: ticket.application_id,
            subject: ticket.subject,
            priority: ticket.priority.as_str().to_string(),
            status: ticket.status.as_str().to_string(),
            assigned_to: ticket.assigned_to,
            created_at: ticket.created_at.to_rfc3339(),
            updated_at: ticket.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessageResponse {
    pub id: String,
    pub ticket_id: String,
    pub sender_id: String,
    pub message: String,
    pub is_internal: bool,
    pub created_at: String,
}

impl From<TicketMessage> for TicketMessageResponse {
    fn from(message: TicketMessage) -> Self {
        Self {
            id: message.id,
            ticket_id: message.ticket_id,
            sender_id: message.sender_id,
            message: message.message,
            is_internal: message.is_internal,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub subject: String,
    /// "low", "medium", "high", or "urgent" (default "medium").
    pub priority: Option<String>,
    pub application_id: Option<String>,
    /// The opening message of the conversation.
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub message: String,
    /// Staff-only note, hidden from the applicant.
    #[serde(default)]
    pub is_internal: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTicketRequest {
    /// Admin profile id, or null to unassign.
    pub admin_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct TicketListQuery {
    pub status: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/tickets", post(create_ticket))
        .route("/tickets", get(list_own_tickets))
        .route("/tickets/:id", get(get_ticket))
        .route("/tickets/:id/messages", get(list_messages))
        .route("/tickets/:id/messages", post(post_message))
        .route("/tickets/:id/messages/stream", get(stream_messages))
}

pub fn admin_router() -> Router {
    Router::new()
        .route("/tickets", get(list_tickets))
        .route("/tickets/:id/status", put(update_ticket_status))
        .route("/tickets/:id/assign", put(assign_ticket))
}

/// Open a support ticket with its first message.
#[utoipa::path(
    post,
    path = "/bff/tickets",
    tag = "tickets",
    request_body = CreateTicketRequest,
    responses(
        (status = 201, body = TicketResponse),
        (status = 422, description = "Invalid input")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn create_ticket(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketResponse>)> {
    let priority = match request.priority.as_deref() {
        Some(raw) => TicketPriority::parse(raw)
            .ok_or_else(|| PortalError::validation(format!("Unknown priority: {raw}")))?,
        None => TicketPriority::Medium,
    };

    let ticket = state
        .tickets
        .open(
            &ctx,
            OpenTicket {
                subject: request.subject,
                priority,
                application_id: request.application_id,
                message: request.message,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ticket.into())))
}

/// The caller's own tickets, newest first.
#[utoipa::path(
    get,
    path = "/bff/tickets",
    tag = "tickets",
    responses((status = 200, body = [TicketResponse])),
    security(("bearer" = []))
)]
pub(crate) async fn list_own_tickets(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<Json<Vec<TicketResponse>>> {
    let student_id = ctx.profile_id.clone();
    let tickets = state.tickets.list_for_student(&ctx, &student_id).await?;
    Ok(Json(tickets.into_iter().map(TicketResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/bff/tickets/{id}",
    tag = "tickets",
    params(("id" = String, Path, description = "Ticket id")),
    responses(
        (status = 200, body = TicketResponse),
        (status = 403, description = "Not your ticket"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn get_ticket(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<TicketResponse>> {
    let ticket = state.tickets.get(&ctx, &id).await?;
    Ok(Json(ticket.into()))
}

/// Conversation thread in creation order. Internal notes staff-only.
#[utoipa::path(
    get,
    path = "/bff/tickets/{id}/messages",
    tag = "tickets",
    params(("id" = String, Path, description = "Ticket id")),
    responses(
        (status = 200, body = [TicketMessageResponse]),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn list_messages(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Vec<TicketMessageResponse>>> {
    let messages = state.tickets.messages(&ctx, &id).await?;
    Ok(Json(
        messages
            .into_iter()
            .map(TicketMessageResponse::from)
            .collect(),
    ))
}

/// Reply on a ticket.
#[utoipa::path(
    post,
    path = "/bff/tickets/{id}/messages",
    tag = "tickets",
    params(("id" = String, Path, description = "Ticket id")),
    request_body = PostMessageRequest,
    responses(
        (status = 201, body = TicketMessageResponse),
        (status = 403, description = "Not your ticket"),
        (status = 422, description = "Ticket is closed")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn post_message(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<TicketMessageResponse>)> {
    let message = state
        .tickets
        .post_message(&ctx, &id, &request.message, request.is_internal)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// Live change events for a ticket conversation (SSE). Each event names the
/// new message; clients refetch the thread on receipt.
#[utoipa::path(
    get,
    path = "/bff/tickets/{id}/messages/stream",
    tag = "tickets",
    params(("id" = String, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "SSE stream of message events"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn stream_messages(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    // Authorizes the subscription and 404s unknown tickets.
    let ticket = state.tickets.get(&ctx, &id).await?;
    let ticket_id = ticket.id;
    let is_staff = ctx.is_staff();

    let receiver = state.tickets.notifier().subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(move |event| {
        let event = event.ok()?;
        if event.ticket_id != ticket_id {
            return None;
        }
        if event.is_internal && !is_staff {
            return None;
        }
        let sse_event = Event::default().event("message").json_data(&event).ok()?;
        Some(Ok::<Event, Infallible>(sse_event))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Support queue, optionally filtered by status. Staff only.
#[utoipa::path(
    get,
    path = "/api/admin/tickets",
    tag = "tickets",
    params(
        PaginationParams,
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses((status = 200, body = PaginatedResponse<TicketResponse>)),
    security(("bearer" = []))
)]
pub(crate) async fn list_tickets(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<TicketListQuery>,
) -> Result<Json<PaginatedResponse<TicketResponse>>> {
    let status = filter
        .status
        .as_deref()
        .map(|raw| {
            TicketStatus::parse(raw)
                .ok_or_else(|| PortalError::validation(format!("Unknown status: {raw}")))
        })
        .transpose()?;

    let (tickets, total) = state
        .tickets
        .list(&ctx, status, params.limit(), params.offset())
        .await?;

    let items = tickets.into_iter().map(TicketResponse::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, &params)))
}

/// Set a ticket's status. Staff only.
#[utoipa::path(
    put,
    path = "/api/admin/tickets/{id}/status",
    tag = "tickets",
    params(("id" = String, Path, description = "Ticket id")),
    request_body = UpdateTicketStatusRequest,
    responses(
        (status = 200, body = TicketResponse),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn update_ticket_status(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<UpdateTicketStatusRequest>,
) -> Result<Json<TicketResponse>> {
    let status = TicketStatus::parse(&request.status).ok_or_else(|| {
        PortalError::validation(format!("Unknown status: {}", request.status))
    })?;

    let ticket = state.tickets.set_status(&ctx, &id, status).await?;
    Ok(Json(ticket.into()))
}

/// Assign or unassign a ticket. Staff only.
#[utoipa::path(
    put,
    path = "/api/admin/tickets/{id}/assign",
    tag = "tickets",
    params(("id" = String, Path, description = "Ticket id")),
    request_body = AssignTicketRequest,
    responses(
        (status = 200, body = TicketResponse),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearer" = []))
)]
pub(crate) async fn assign_ticket(
    Extension(state): Extension<AppState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(request): Json<AssignTicketRequest>,
) -> Result<Json<TicketResponse>> {
    let ticket = state.tickets.assign(&ctx, &id, request.admin_id).await?;
    Ok(Json(ticket.into()))
}
