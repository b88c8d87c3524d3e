//! Driving ports for the reservation engine.
//!
//! Inbound adapters depend on these traits and payload structs only; the
//! concrete service lives in `domain::reservation_service`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    BoatId, Error, Reservation, ReservationId, ReservationKind, ReservationStatus, Role, UserId,
};

/// The authenticated principal an operation runs as.
///
/// Supplied by the external identity provider via the session; the engine
/// trusts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    /// True when the caller may act on a reservation owned by `owner`.
    pub fn may_act_on(&self, owner: &UserId) -> bool {
        self.role.is_admin() || self.user_id == *owner
    }
}

/// Validated input for creating a reservation on behalf of the caller.
#[derive(Debug, Clone)]
pub struct CreateReservationRequest {
    pub boat_id: BoatId,
    pub date: NaiveDate,
    pub kind: ReservationKind,
    pub notes: String,
}

/// Reservation snapshot handed to inbound adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationPayload {
    pub id: ReservationId,
    pub user_id: UserId,
    pub boat_id: BoatId,
    pub date: NaiveDate,
    pub kind: ReservationKind,
    pub status: ReservationStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationPayload {
    fn from(value: Reservation) -> Self {
        Self {
            id: value.id(),
            user_id: *value.user_id(),
            boat_id: *value.boat_id(),
            date: value.date(),
            kind: value.kind(),
            status: value.status(),
            notes: value.notes().to_owned(),
            created_at: value.created_at(),
        }
    }
}

/// Commands mutating reservation state.
#[async_trait]
pub trait ReservationCommand: Send + Sync {
    /// Book a day for the caller, deducting quota atomically.
    async fn create_reservation(
        &self,
        caller: Caller,
        request: CreateReservationRequest,
    ) -> Result<ReservationPayload, Error>;

    /// Confirm an unconfirmed reservation (owner or admin).
    async fn confirm_reservation(
        &self,
        caller: Caller,
        id: ReservationId,
    ) -> Result<ReservationPayload, Error>;

    /// Delete a reservation (owner or admin), restoring quota and promoting
    /// the next queued reservation when the primary goes away.
    async fn delete_reservation(&self, caller: Caller, id: ReservationId) -> Result<(), Error>;
}

/// Counts of transitions applied by one archival sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Elapsed reservations moved to legacy (quota restored).
    pub archived: usize,
    /// Due primaries promoted from pending to unconfirmed.
    pub promoted: usize,
    /// Candidates skipped because their individual transition failed.
    pub skipped: usize,
}

/// Driving port for running the archival sweep on demand.
#[async_trait]
pub trait SweepCommand: Send + Sync {
    /// Run one sweep pass and report the transitions applied.
    async fn run_sweep(&self) -> Result<SweepOutcome, Error>;
}

/// Read-side queries over reservations.
#[async_trait]
pub trait ReservationQuery: Send + Sync {
    /// Queue order for one boat+date, primary first.
    async fn queue_for_boat_date(
        &self,
        boat_id: BoatId,
        date: NaiveDate,
    ) -> Result<Vec<ReservationPayload>, Error>;

    /// Every reservation belonging to a user.
    async fn reservations_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ReservationPayload>, Error>;

    /// The primary reservation of each occupied date for a boat and year.
    async fn occupied_dates(
        &self,
        boat_id: BoatId,
        year: i32,
    ) -> Result<Vec<ReservationPayload>, Error>;
}
