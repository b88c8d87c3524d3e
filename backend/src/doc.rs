//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every reservation, boat, user, admin, and health
//! endpoint, the DTO schemas they exchange, and the session-cookie security
//! scheme. The generated specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, ReservationKind, ReservationStatus, Role};
use crate::inbound::http::admin::SweepResponseBody;
use crate::inbound::http::boats::BoatResponseBody;
use crate::inbound::http::reservations::{CreateReservationRequestBody, ReservationResponseBody};
use crate::inbound::http::users::UserResponseBody;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie established by the identity provider.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Boat share backend API",
        description = "HTTP interface for day reservations against per-member quotas."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::reservations::create_reservation,
        crate::inbound::http::reservations::confirm_reservation,
        crate::inbound::http::reservations::delete_reservation,
        crate::inbound::http::boats::list_boats,
        crate::inbound::http::boats::get_boat,
        crate::inbound::http::boats::get_boat_date_queue,
        crate::inbound::http::boats::get_occupied_dates,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::current_user_reservations,
        crate::inbound::http::admin::run_sweep,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ReservationKind,
        ReservationStatus,
        Role,
        CreateReservationRequestBody,
        ReservationResponseBody,
        BoatResponseBody,
        UserResponseBody,
        SweepResponseBody,
    )),
    tags(
        (name = "reservations", description = "Reservation lifecycle operations"),
        (name = "boats", description = "Boats and their day occupancy"),
        (name = "users", description = "The session member's profile and bookings"),
        (name = "admin", description = "Operational endpoints for administrators"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
