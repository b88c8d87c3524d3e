//! Reservation HTTP handlers.
//!
//! ```text
//! POST   /api/v1/reservations                Book a day against quota
//! POST   /api/v1/reservations/{id}/confirm   Confirm an unconfirmed booking
//! DELETE /api/v1/reservations/{id}           Delete a booking, promoting the queue
//! ```

use actix_web::{delete, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateReservationRequest, ReservationPayload};
use crate::domain::{
    BoatId, Error, ReservationId, ReservationKind, ReservationStatus,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_date, parse_kind, parse_uuid, FieldName};
use crate::inbound::http::ApiResult;

/// Request payload for booking a reservation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequestBody {
    #[schema(format = "uuid")]
    pub boat_id: String,
    /// Calendar day being reserved, `YYYY-MM-DD`.
    #[schema(example = "2026-08-15")]
    pub date: String,
    /// One of `standard`, `substitution`, `contingency`.
    pub kind: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Reservation representation returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "uuid")]
    pub boat_id: String,
    #[schema(example = "2026-08-15")]
    pub date: String,
    pub kind: ReservationKind,
    pub status: ReservationStatus,
    pub notes: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<ReservationPayload> for ReservationResponseBody {
    fn from(value: ReservationPayload) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            boat_id: value.boat_id.to_string(),
            date: value.date.to_string(),
            kind: value.kind,
            status: value.status,
            notes: value.notes,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

fn parse_create_request(
    body: CreateReservationRequestBody,
) -> Result<CreateReservationRequest, Error> {
    Ok(CreateReservationRequest {
        boat_id: BoatId::from_uuid(parse_uuid(body.boat_id, FieldName::new("boatId"))?),
        date: parse_date(body.date, FieldName::new("date"))?,
        kind: parse_kind(body.kind, FieldName::new("kind"))?,
        notes: body.notes.unwrap_or_default(),
    })
}

fn parse_reservation_id(raw: String) -> Result<ReservationId, Error> {
    Ok(ReservationId::from_uuid(parse_uuid(
        raw,
        FieldName::new("reservationId"),
    )?))
}

/// Book a single day of a boat for the authenticated member.
#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    request_body = CreateReservationRequestBody,
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Boat or user not found", body = Error),
        (status = 409, description = "Insufficient quota", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "createReservation",
    security(("SessionCookie" = []))
)]
#[post("/reservations")]
pub async fn create_reservation(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateReservationRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let request = parse_create_request(payload.into_inner())?;

    let reservation = state.reservations.create_reservation(caller, request).await?;

    Ok(HttpResponse::Created().json(ReservationResponseBody::from(reservation)))
}

/// Confirm a reservation that is awaiting confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/confirm",
    params(("id" = String, Path, format = "uuid", description = "Reservation identifier")),
    responses(
        (status = 200, description = "Reservation confirmed", body = ReservationResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner or an admin", body = Error),
        (status = 404, description = "Reservation not found", body = Error),
        (status = 409, description = "Reservation is not awaiting confirmation", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "confirmReservation",
    security(("SessionCookie" = []))
)]
#[post("/reservations/{id}/confirm")]
pub async fn confirm_reservation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReservationResponseBody>> {
    let caller = session.require_caller()?;
    let id = parse_reservation_id(path.into_inner())?;

    let reservation = state.reservations.confirm_reservation(caller, id).await?;

    Ok(web::Json(ReservationResponseBody::from(reservation)))
}

/// Delete a reservation, restoring its quota and promoting the next in queue.
#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    params(("id" = String, Path, format = "uuid", description = "Reservation identifier")),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner or an admin", body = Error),
        (status = 404, description = "Reservation not found", body = Error),
        (status = 409, description = "Confirmed or archived reservations cannot be deleted", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "deleteReservation",
    security(("SessionCookie" = []))
)]
#[delete("/reservations/{id}")]
pub async fn delete_reservation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let id = parse_reservation_id(path.into_inner())?;

    state.reservations.delete_reservation(caller, id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "reservations_tests.rs"]
mod tests;
