//! Domain ports: driven repository/store traits and driving service traits.
//!
//! Driven ports carry their own `thiserror` error enums so adapters stay
//! transport-agnostic; services map those into the domain [`crate::domain::Error`].

pub mod boat_repository;
pub mod reservation_api;
pub mod reservation_store;
pub mod user_repository;

pub use boat_repository::{BoatPersistenceError, BoatRepository};
pub use reservation_api::{
    Caller, CreateReservationRequest, ReservationCommand, ReservationPayload, ReservationQuery,
    SweepCommand, SweepOutcome,
};
pub use reservation_store::{ReservationStore, ReservationStoreError};
pub use user_repository::{UserPersistenceError, UserRepository};

#[cfg(test)]
pub use boat_repository::MockBoatRepository;
#[cfg(test)]
pub use reservation_store::MockReservationStore;
#[cfg(test)]
pub use user_repository::MockUserRepository;
