//! Builders wiring persistence adapters into the shared HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::{ReservationService, ReservationSweep};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DieselBoatRepository, DieselReservationStore, DieselUserRepository,
};

use super::ServerConfig;

/// Build the shared HTTP state over the Diesel adapters.
///
/// The same reservation service instance backs both the command and the query
/// port; the sweep port gets its own worker over the same store so the admin
/// endpoint shares the background task's transition logic.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let store = Arc::new(DieselReservationStore::new(config.db_pool.clone()));
    let boats = Arc::new(DieselBoatRepository::new(config.db_pool.clone()));
    let users = Arc::new(DieselUserRepository::new(config.db_pool.clone()));

    let service = Arc::new(ReservationService::new(
        store.clone(),
        boats.clone(),
        clock.clone(),
    ));
    let sweep = Arc::new(ReservationSweep::new(store, clock));

    web::Data::new(HttpState {
        reservations: service.clone(),
        reservation_queries: service,
        sweep,
        users,
        boats,
    })
}
