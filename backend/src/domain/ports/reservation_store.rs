//! Port for the transactional reservation + quota store.
//!
//! The store owns the atomicity guarantees of the engine: the quota
//! check-and-deduct happens under a lock on the user's quota row, status
//! transitions are conditional on the status they leave, and the quota
//! restore is gated by the reservation's `quota_restored` flag inside the
//! same transaction. Adapters must uphold these contracts; the domain
//! services only sequence the calls.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{BoatId, Reservation, ReservationId, ReservationStatus, UserId};

/// Errors raised by reservation store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReservationStoreError {
    /// Store connection could not be established.
    #[error("reservation store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("reservation store query failed: {message}")]
    Query { message: String },

    /// The locked check-and-deduct found no remaining quota unit.
    #[error("no remaining quota for the requested reservation kind")]
    InsufficientQuota,

    /// The reservation references a user with no quota row.
    #[error("reservation user does not exist")]
    UserMissing,

    /// The targeted reservation does not exist.
    #[error("reservation does not exist")]
    ReservationMissing,

    /// The reservation's current status forbids deletion.
    #[error("reservation with status {status} cannot be deleted")]
    NotDeletable { status: ReservationStatus },
}

impl ReservationStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reservation persistence and the quota ledger it guards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Persist a new reservation and deduct one quota unit of its kind, as a
    /// single transaction over a locked user row. Fails with
    /// [`ReservationStoreError::InsufficientQuota`] (nothing persisted) when
    /// no unit remains.
    async fn insert_with_quota_deduction(
        &self,
        reservation: &Reservation,
    ) -> Result<(), ReservationStoreError>;

    /// Fetch a reservation by id.
    async fn find_by_id(
        &self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, ReservationStoreError>;

    /// All active (non-cancelled, non-legacy) reservations for one
    /// boat+date. Unordered; callers run queue resolution.
    async fn list_active_for_boat_date(
        &self,
        boat_id: &BoatId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationStoreError>;

    /// Every reservation belonging to a user, newest date first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, ReservationStoreError>;

    /// Active reservations for a boat within one calendar year.
    async fn list_active_for_boat_year(
        &self,
        boat_id: &BoatId,
        year: i32,
    ) -> Result<Vec<Reservation>, ReservationStoreError>;

    /// Active reservations dated strictly before `before` (archive
    /// candidates).
    async fn list_active_dated_before(
        &self,
        before: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationStoreError>;

    /// Active reservations dated within `[from, to]` (promotion window).
    async fn list_active_dated_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationStoreError>;

    /// Transition `id` from `from` to `to` iff the row still carries `from`.
    /// Returns whether the transition fired, so racing transitions surface
    /// as a clean `false` instead of a lost update.
    async fn transition_status(
        &self,
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<bool, ReservationStoreError>;

    /// Delete a reservation, crediting its quota unit back (once, gated by
    /// the `quota_restored` flag), re-checking deletability on the locked
    /// row. Returns the deleted reservation for queue re-resolution.
    async fn delete_restoring_quota(
        &self,
        id: ReservationId,
    ) -> Result<Reservation, ReservationStoreError>;

    /// Archive one reservation to legacy status, crediting its quota unit
    /// back (once). Idempotent: archiving an already-terminal or missing
    /// reservation returns `false` without touching anything.
    async fn archive_restoring_quota(
        &self,
        id: ReservationId,
    ) -> Result<bool, ReservationStoreError>;
}
