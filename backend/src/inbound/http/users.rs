//! User HTTP handlers.
//!
//! ```text
//! GET /api/v1/users/me                Profile with remaining quota counters
//! GET /api/v1/users/me/reservations   The session user's reservations
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::UserPersistenceError;
use crate::domain::{Error, ReservationKind, Role, User};
use crate::inbound::http::reservations::ReservationResponseBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Profile representation returned to clients, quota counters included.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[schema(format = "uuid")]
    pub boat_id: Option<String>,
    pub standard_quota: u32,
    pub substitution_quota: u32,
    pub contingency_quota: u32,
}

impl From<User> for UserResponseBody {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_owned(),
            email: value.email().to_owned(),
            role: value.role(),
            boat_id: value.boat_id().map(ToString::to_string),
            standard_quota: value.quota_for(ReservationKind::Standard),
            substitution_quota: value.quota_for(ReservationKind::Substitution),
            contingency_quota: value.quota_for(ReservationKind::Contingency),
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}

/// The authenticated member's profile and remaining quotas.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = UserResponseBody),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("SessionCookie" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponseBody>> {
    let caller = session.require_caller()?;

    let user = state
        .users
        .find_by_id(&caller.user_id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::not_found("user not found"))?;

    Ok(web::Json(UserResponseBody::from(user)))
}

/// Every reservation belonging to the authenticated member.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/reservations",
    responses(
        (status = 200, description = "Reservations", body = [ReservationResponseBody]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUserReservations",
    security(("SessionCookie" = []))
)]
#[get("/users/me/reservations")]
pub async fn current_user_reservations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ReservationResponseBody>>> {
    let caller = session.require_caller()?;

    let reservations = state
        .reservation_queries
        .reservations_for_user(caller.user_id)
        .await?;

    Ok(web::Json(
        reservations
            .into_iter()
            .map(ReservationResponseBody::from)
            .collect(),
    ))
}
