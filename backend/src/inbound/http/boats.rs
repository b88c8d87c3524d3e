//! Boat HTTP handlers.
//!
//! ```text
//! GET /api/v1/boats                              List boats
//! GET /api/v1/boats/{id}                         Boat detail
//! GET /api/v1/boats/{id}/reservations?date=      Queue for one day, primary first
//! GET /api/v1/boats/{id}/occupied-dates?year=    Primary reservation per occupied date
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::BoatPersistenceError;
use crate::domain::{Boat, BoatId, Error};
use crate::inbound::http::reservations::ReservationResponseBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_date, parse_uuid, FieldName};
use crate::inbound::http::ApiResult;

/// Boat representation returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoatResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub capacity: u32,
}

impl From<Boat> for BoatResponseBody {
    fn from(value: Boat) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_owned(),
            capacity: value.capacity(),
        }
    }
}

/// Query string selecting the day whose queue is requested.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueQuery {
    date: String,
}

/// Query string selecting the calendar year for occupancy rendering.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupiedDatesQuery {
    year: i32,
}

fn map_boat_error(error: BoatPersistenceError) -> Error {
    match error {
        BoatPersistenceError::Connection { message } => Error::service_unavailable(message),
        BoatPersistenceError::Query { message } => Error::internal(message),
    }
}

fn parse_boat_id(raw: String) -> Result<BoatId, Error> {
    Ok(BoatId::from_uuid(parse_uuid(
        raw,
        FieldName::new("boatId"),
    )?))
}

/// List every boat of the group.
#[utoipa::path(
    get,
    path = "/api/v1/boats",
    responses(
        (status = 200, description = "Boats", body = [BoatResponseBody]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["boats"],
    operation_id = "listBoats",
    security(("SessionCookie" = []))
)]
#[get("/boats")]
pub async fn list_boats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BoatResponseBody>>> {
    session.require_caller()?;

    let boats = state.boats.list().await.map_err(map_boat_error)?;

    Ok(web::Json(
        boats.into_iter().map(BoatResponseBody::from).collect(),
    ))
}

/// Fetch one boat.
#[utoipa::path(
    get,
    path = "/api/v1/boats/{id}",
    params(("id" = String, Path, format = "uuid", description = "Boat identifier")),
    responses(
        (status = 200, description = "Boat", body = BoatResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Boat not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["boats"],
    operation_id = "getBoat",
    security(("SessionCookie" = []))
)]
#[get("/boats/{id}")]
pub async fn get_boat(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<BoatResponseBody>> {
    session.require_caller()?;
    let boat_id = parse_boat_id(path.into_inner())?;

    let boat = state
        .boats
        .find_by_id(&boat_id)
        .await
        .map_err(map_boat_error)?
        .ok_or_else(|| Error::not_found(format!("boat {boat_id} not found")))?;

    Ok(web::Json(BoatResponseBody::from(boat)))
}

/// Queue for one boat and day, primary first: "who's up next".
#[utoipa::path(
    get,
    path = "/api/v1/boats/{id}/reservations",
    params(
        ("id" = String, Path, format = "uuid", description = "Boat identifier"),
        ("date" = String, Query, description = "Calendar day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Reservations in queue order", body = [ReservationResponseBody]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["boats"],
    operation_id = "getBoatDateQueue",
    security(("SessionCookie" = []))
)]
#[get("/boats/{id}/reservations")]
pub async fn get_boat_date_queue(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<QueueQuery>,
) -> ApiResult<web::Json<Vec<ReservationResponseBody>>> {
    session.require_caller()?;
    let boat_id = parse_boat_id(path.into_inner())?;
    let date = parse_date(query.into_inner().date, FieldName::new("date"))?;

    let queue = state
        .reservation_queries
        .queue_for_boat_date(boat_id, date)
        .await?;

    Ok(web::Json(
        queue.into_iter().map(ReservationResponseBody::from).collect(),
    ))
}

/// Primary reservation of each occupied date in a year, for calendar views.
#[utoipa::path(
    get,
    path = "/api/v1/boats/{id}/occupied-dates",
    params(
        ("id" = String, Path, format = "uuid", description = "Boat identifier"),
        ("year" = i32, Query, description = "Calendar year")
    ),
    responses(
        (status = 200, description = "Primary reservations, date order", body = [ReservationResponseBody]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["boats"],
    operation_id = "getOccupiedDates",
    security(("SessionCookie" = []))
)]
#[get("/boats/{id}/occupied-dates")]
pub async fn get_occupied_dates(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<OccupiedDatesQuery>,
) -> ApiResult<web::Json<Vec<ReservationResponseBody>>> {
    session.require_caller()?;
    let boat_id = parse_boat_id(path.into_inner())?;

    let occupied = state
        .reservation_queries
        .occupied_dates(boat_id, query.into_inner().year)
        .await?;

    Ok(web::Json(
        occupied
            .into_iter()
            .map(ReservationResponseBody::from)
            .collect(),
    ))
}
