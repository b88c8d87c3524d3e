//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The external identity provider establishes the cookie session; this module
//! only reads the authenticated principal back out of it. A missing or
//! tampered principal surfaces as `401 Unauthorized`, never as a panic.

use std::str::FromStr;

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::ports::Caller;
use crate::domain::{Error, Role, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Fetch the session principal, if one is present and well-formed.
    pub fn caller(&self) -> Result<Option<Caller>, Error> {
        let raw_id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw_id) = raw_id else {
            return Ok(None);
        };

        let Ok(uuid) = Uuid::parse_str(&raw_id) else {
            tracing::warn!("invalid user id in session cookie");
            return Ok(None);
        };

        Ok(Some(Caller {
            user_id: UserId::from_uuid(uuid),
            role: self.role()?,
        }))
    }

    /// Require an authenticated principal or return `401 Unauthorized`.
    pub fn require_caller(&self) -> Result<Caller, Error> {
        self.caller()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Role claim from the session; anything unexpected falls back to the
    /// least-privileged role.
    fn role(&self) -> Result<Role, Error> {
        let raw = self
            .0
            .get::<String>(ROLE_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;

        Ok(raw
            .and_then(|value| match Role::from_str(&value) {
                Ok(role) => Some(role),
                Err(error) => {
                    tracing::warn!(%error, "invalid role in session cookie");
                    None
                }
            })
            .unwrap_or(Role::Member))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
