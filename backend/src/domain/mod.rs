//! Domain primitives, aggregates, and the reservation engine.
//!
//! Purpose: hold the reservation lifecycle rules (state machine, queue
//! resolution, sweep) and the strongly typed entities they operate on,
//! independent of any transport or storage framework. Adapters depend on
//! this module; it depends on nothing above it.

pub mod boat;
pub mod error;
pub mod ports;
pub mod reservation;
pub mod reservation_service;
pub mod reservation_sweep;
pub mod schedule;
pub mod user;

pub use self::boat::{Boat, BoatId, BoatValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::reservation::{
    days_until, has_elapsed, in_confirmation_window, initial_status, local_today,
    ParseReservationKindError, ParseReservationStatusError, Reservation, ReservationDraft,
    ReservationId, ReservationKind, ReservationStatus, BOAT_TIMEZONE, CONFIRMATION_WINDOW_DAYS,
};
pub use self::reservation_service::ReservationService;
pub use self::reservation_sweep::{ReservationSweep, SWEEP_INTERVAL};
pub use self::user::{ParseRoleError, Role, User, UserDraft, UserId, UserValidationError};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
