//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::{get, web, HttpResponse};
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    BoatPersistenceError, BoatRepository, Caller, CreateReservationRequest, ReservationCommand,
    ReservationPayload, ReservationQuery, SweepCommand, SweepOutcome, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Boat, BoatId, Error, ReservationId, User, UserId};
use crate::inbound::http::session::{ROLE_KEY, USER_ID_KEY};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Seed the session principal the external identity provider would supply.
#[get("/test-login/{user_id}/{role}")]
pub async fn test_login(session: Session, path: web::Path<(String, String)>) -> HttpResponse {
    let (user_id, role) = path.into_inner();
    session.insert(USER_ID_KEY, user_id).expect("seed user id");
    session.insert(ROLE_KEY, role).expect("seed role");
    HttpResponse::Ok().finish()
}

/// Log in through [`test_login`] and return the resulting session cookie.
pub async fn login_as(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    user_id: &str,
    role: &str,
) -> Cookie<'static> {
    let request = actix_web::test::TestRequest::get()
        .uri(&format!("/test-login/{user_id}/{role}"))
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    assert!(response.status().is_success());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Programmable stand-in for every port the HTTP state carries.
///
/// Each field holds the canned outcome for one operation; an operation whose
/// field is `None` reports an unexpected call so tests fail loudly instead of
/// silently passing on a default.
#[derive(Default)]
pub struct StubPorts {
    pub create_reservation: Option<Result<ReservationPayload, Error>>,
    pub confirm_reservation: Option<Result<ReservationPayload, Error>>,
    pub delete_reservation: Option<Result<(), Error>>,
    pub queue: Option<Result<Vec<ReservationPayload>, Error>>,
    pub user_reservations: Option<Result<Vec<ReservationPayload>, Error>>,
    pub occupied_dates: Option<Result<Vec<ReservationPayload>, Error>>,
    pub sweep: Option<Result<SweepOutcome, Error>>,
    pub user: Option<User>,
    pub boats: Vec<Boat>,
}

fn unexpected(operation: &str) -> Error {
    Error::internal(format!("unexpected {operation} call"))
}

#[async_trait]
impl ReservationCommand for StubPorts {
    async fn create_reservation(
        &self,
        _caller: Caller,
        _request: CreateReservationRequest,
    ) -> Result<ReservationPayload, Error> {
        self.create_reservation
            .clone()
            .unwrap_or_else(|| Err(unexpected("create_reservation")))
    }

    async fn confirm_reservation(
        &self,
        _caller: Caller,
        _id: ReservationId,
    ) -> Result<ReservationPayload, Error> {
        self.confirm_reservation
            .clone()
            .unwrap_or_else(|| Err(unexpected("confirm_reservation")))
    }

    async fn delete_reservation(&self, _caller: Caller, _id: ReservationId) -> Result<(), Error> {
        self.delete_reservation
            .clone()
            .unwrap_or_else(|| Err(unexpected("delete_reservation")))
    }
}

#[async_trait]
impl ReservationQuery for StubPorts {
    async fn queue_for_boat_date(
        &self,
        _boat_id: BoatId,
        _date: NaiveDate,
    ) -> Result<Vec<ReservationPayload>, Error> {
        self.queue
            .clone()
            .unwrap_or_else(|| Err(unexpected("queue_for_boat_date")))
    }

    async fn reservations_for_user(
        &self,
        _user_id: UserId,
    ) -> Result<Vec<ReservationPayload>, Error> {
        self.user_reservations
            .clone()
            .unwrap_or_else(|| Err(unexpected("reservations_for_user")))
    }

    async fn occupied_dates(
        &self,
        _boat_id: BoatId,
        _year: i32,
    ) -> Result<Vec<ReservationPayload>, Error> {
        self.occupied_dates
            .clone()
            .unwrap_or_else(|| Err(unexpected("occupied_dates")))
    }
}

#[async_trait]
impl SweepCommand for StubPorts {
    async fn run_sweep(&self) -> Result<SweepOutcome, Error> {
        self.sweep
            .clone()
            .unwrap_or_else(|| Err(unexpected("run_sweep")))
    }
}

#[async_trait]
impl UserRepository for StubPorts {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.user.clone().filter(|user| user.id() == id))
    }
}

#[async_trait]
impl BoatRepository for StubPorts {
    async fn find_by_id(&self, id: &BoatId) -> Result<Option<Boat>, BoatPersistenceError> {
        Ok(self.boats.iter().find(|boat| boat.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Boat>, BoatPersistenceError> {
        Ok(self.boats.clone())
    }
}

/// Assemble an [`HttpState`] where every port is the same stub bundle.
pub fn stub_state(ports: StubPorts) -> HttpState {
    let ports = Arc::new(ports);
    HttpState {
        reservations: ports.clone(),
        reservation_queries: ports.clone(),
        sweep: ports.clone(),
        users: ports.clone(),
        boats: ports,
    }
}
