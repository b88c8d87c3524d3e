//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BoatRepository, ReservationCommand, ReservationQuery, SweepCommand, UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub reservations: Arc<dyn ReservationCommand>,
    pub reservation_queries: Arc<dyn ReservationQuery>,
    pub sweep: Arc<dyn SweepCommand>,
    pub users: Arc<dyn UserRepository>,
    pub boats: Arc<dyn BoatRepository>,
}
