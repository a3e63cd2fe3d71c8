//! Request handlers for the `/api` routes.
//!
//! Handlers only translate between HTTP and the core ticket operations. Body
//! extraction never fails on its own: an unreadable or incomplete body becomes
//! an empty input, which the core then rejects with the operation's message.

use super::{AppState, error::ApiError};
use crate::{
    core::ticket::{self, DELETED_MESSAGE, TicketInput, TicketStats},
    entities::TicketModel,
    errors::Error,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Body of `PATCH /api/tickets/{id}/estado`.
#[derive(Debug, Default, Deserialize)]
pub struct EstadoInput {
    /// Requested status; validated by the core
    pub estado: Option<String>,
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    /// Confirmation text
    pub message: &'static str,
}

fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Unreadable request body: {rejection}");
            T::default()
        }
    }
}

// Ids that do not parse as integers cannot name a ticket.
fn ticket_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, Error> {
    path.map(|Path(id)| id).map_err(|rejection| {
        debug!("Unusable ticket id: {rejection}");
        Error::TicketNotFound { id: -1 }
    })
}

/// `GET /api/tickets`
pub async fn list_tickets(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<TicketModel>>> {
    ticket::list_tickets(&state.database)
        .await
        .map(Json)
        .map_err(ApiError::context("Error al obtener tickets"))
}

/// `POST /api/tickets`
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TicketInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TicketModel>)> {
    let input = body_or_default(payload);

    ticket::create_ticket(&state.database, input)
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(ApiError::context("Error al crear ticket"))
}

/// `PUT /api/tickets/{id}`
pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TicketInput>, JsonRejection>,
) -> ApiResult<Json<TicketModel>> {
    let on_error = "Error al actualizar ticket";
    let input = body_or_default(payload);
    let fields_ok = input.clone().validate().map_err(ApiError::context(on_error));
    let id = ticket_id(path).map_err(ApiError::context(on_error));

    // Body problems are reported ahead of an unusable id.
    fields_ok?;
    let id = id?;

    ticket::update_ticket(&state.database, id, input)
        .await
        .map(Json)
        .map_err(ApiError::context(on_error))
}

/// `PATCH /api/tickets/{id}/estado`
pub async fn update_ticket_estado(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EstadoInput>, JsonRejection>,
) -> ApiResult<Json<TicketModel>> {
    let on_error = "Error al actualizar estado";
    let EstadoInput { estado } = body_or_default(payload);
    let estado_ok = ticket::parse_estado(estado.as_deref()).map_err(ApiError::context(on_error));
    let id = ticket_id(path).map_err(ApiError::context(on_error));

    estado_ok?;
    let id = id?;

    ticket::update_ticket_estado(&state.database, id, estado.as_deref())
        .await
        .map(Json)
        .map_err(ApiError::context(on_error))
}

/// `DELETE /api/tickets/{id}`
pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageBody>> {
    let on_error = "Error al eliminar ticket";
    let id = ticket_id(path).map_err(ApiError::context(on_error))?;

    ticket::delete_ticket(&state.database, id)
        .await
        .map(|()| {
            Json(MessageBody {
                message: DELETED_MESSAGE,
            })
        })
        .map_err(ApiError::context(on_error))
}

/// `GET /api/estadisticas`
pub async fn ticket_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<TicketStats>> {
    ticket::ticket_stats(&state.database)
        .await
        .map(Json)
        .map_err(ApiError::context("Error al obtener estadísticas"))
}
