//! PostgreSQL-backed `ReservationStore` implementation using Diesel ORM.
//!
//! This adapter owns the engine's atomicity guarantees:
//!
//! - creation locks the member's quota row (`SELECT … FOR UPDATE`) for the
//!   duration of the check-and-deduct, so two concurrent bookings cannot both
//!   spend the last unit;
//! - deletion and archival lock the reservation row, re-check preconditions
//!   on the locked state, and credit quota back only while `quota_restored`
//!   is still false — the flag flips in the same transaction;
//! - status transitions are conditional updates (`… WHERE status = $from`),
//!   so racing transitions report `false` instead of clobbering each other.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ReservationStore, ReservationStoreError};
use crate::domain::{
    BoatId, Reservation, ReservationDraft, ReservationId, ReservationKind, ReservationStatus,
    UserId,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewReservationRow, QuotaCountersRow, ReservationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{reservations, users};

/// Statuses excluded from every active-reservation query.
const TERMINAL_STATUSES: [&str; 2] = ["cancelled", "legacy"];

/// Diesel-backed implementation of the reservation store port.
#[derive(Clone)]
pub struct DieselReservationStore {
    pool: DbPool,
}

impl DieselReservationStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to store errors.
fn map_pool_error(error: PoolError) -> ReservationStoreError {
    map_basic_pool_error(error, ReservationStoreError::connection)
}

/// Map Diesel errors to store errors.
fn map_diesel_error(error: diesel::result::Error) -> ReservationStoreError {
    map_basic_diesel_error(
        error,
        ReservationStoreError::query,
        ReservationStoreError::connection,
    )
}

/// Error carrier for transaction closures: keeps deliberate aborts distinct
/// from Diesel failures until the final mapping.
enum TxError {
    Abort(ReservationStoreError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_tx_error(error: TxError) -> ReservationStoreError {
    match error {
        TxError::Abort(store_error) => store_error,
        TxError::Diesel(diesel_error) => map_diesel_error(diesel_error),
    }
}

/// Convert a database row into a validated domain reservation.
fn row_to_reservation(row: ReservationRow) -> Result<Reservation, ReservationStoreError> {
    let ReservationRow {
        id,
        user_id,
        boat_id,
        date,
        kind,
        status,
        notes,
        quota_restored,
        created_at,
        updated_at: _,
    } = row;

    let kind = kind
        .parse::<ReservationKind>()
        .map_err(|err| ReservationStoreError::query(err.to_string()))?;
    let status = status
        .parse::<ReservationStatus>()
        .map_err(|err| ReservationStoreError::query(err.to_string()))?;

    Ok(Reservation::new(ReservationDraft {
        id: ReservationId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        boat_id: BoatId::from_uuid(boat_id),
        date,
        kind,
        status,
        notes,
        created_at,
        quota_restored,
    }))
}

fn rows_to_reservations(
    rows: Vec<ReservationRow>,
) -> Result<Vec<Reservation>, ReservationStoreError> {
    rows.into_iter().map(row_to_reservation).collect()
}

/// Credit one quota unit of `kind` back to `user_id`.
async fn credit_quota(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    kind: ReservationKind,
) -> Result<(), diesel::result::Error> {
    let target = diesel::update(users::table.filter(users::id.eq(user_id)));
    match kind {
        ReservationKind::Standard => {
            target
                .set(users::standard_quota.eq(users::standard_quota + 1))
                .execute(conn)
                .await?;
        }
        ReservationKind::Substitution => {
            target
                .set(users::substitution_quota.eq(users::substitution_quota + 1))
                .execute(conn)
                .await?;
        }
        ReservationKind::Contingency => {
            target
                .set(users::contingency_quota.eq(users::contingency_quota + 1))
                .execute(conn)
                .await?;
        }
    }
    Ok(())
}

/// Deduct one quota unit of `kind` from `user_id`.
async fn deduct_quota(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    kind: ReservationKind,
) -> Result<(), diesel::result::Error> {
    let target = diesel::update(users::table.filter(users::id.eq(user_id)));
    match kind {
        ReservationKind::Standard => {
            target
                .set(users::standard_quota.eq(users::standard_quota - 1))
                .execute(conn)
                .await?;
        }
        ReservationKind::Substitution => {
            target
                .set(users::substitution_quota.eq(users::substitution_quota - 1))
                .execute(conn)
                .await?;
        }
        ReservationKind::Contingency => {
            target
                .set(users::contingency_quota.eq(users::contingency_quota - 1))
                .execute(conn)
                .await?;
        }
    }
    Ok(())
}

impl QuotaCountersRow {
    const fn remaining(&self, kind: ReservationKind) -> i32 {
        match kind {
            ReservationKind::Standard => self.standard_quota,
            ReservationKind::Substitution => self.substitution_quota,
            ReservationKind::Contingency => self.contingency_quota,
        }
    }
}

#[async_trait]
impl ReservationStore for DieselReservationStore {
    async fn insert_with_quota_deduction(
        &self,
        reservation: &Reservation,
    ) -> Result<(), ReservationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user_id = *reservation.user_id().as_uuid();
        let kind = reservation.kind();
        let new_row = NewReservationRow {
            id: *reservation.id().as_uuid(),
            user_id,
            boat_id: *reservation.boat_id().as_uuid(),
            date: reservation.date(),
            kind: kind.as_str(),
            status: reservation.status().as_str(),
            notes: reservation.notes(),
            quota_restored: reservation.quota_restored(),
            created_at: reservation.created_at(),
        };

        conn.transaction(|conn| {
            async move {
                // Lock the member's quota row for the whole check-and-deduct.
                let counters: Option<QuotaCountersRow> = users::table
                    .filter(users::id.eq(user_id))
                    .select(QuotaCountersRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let counters = counters
                    .ok_or(TxError::Abort(ReservationStoreError::UserMissing))?;

                if counters.remaining(kind) < 1 {
                    return Err(TxError::Abort(ReservationStoreError::InsufficientQuota));
                }

                deduct_quota(conn, user_id, kind).await?;

                diesel::insert_into(reservations::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn find_by_id(
        &self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, ReservationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = reservations::table
            .filter(reservations::id.eq(id.as_uuid()))
            .select(ReservationRow::as_select())
            .first::<ReservationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_reservation).transpose()
    }

    async fn list_active_for_boat_date(
        &self,
        boat_id: &BoatId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReservationRow> = reservations::table
            .filter(
                reservations::boat_id
                    .eq(boat_id.as_uuid())
                    .and(reservations::date.eq(date))
                    .and(reservations::status.ne_all(TERMINAL_STATUSES)),
            )
            .order((reservations::created_at, reservations::id))
            .select(ReservationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_reservations(rows)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReservationRow> = reservations::table
            .filter(reservations::user_id.eq(user_id.as_uuid()))
            .order((reservations::date.desc(), reservations::created_at.desc()))
            .select(ReservationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_reservations(rows)
    }

    async fn list_active_for_boat_year(
        &self,
        boat_id: &BoatId,
        year: i32,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| ReservationStoreError::query(format!("invalid year {year}")))?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| ReservationStoreError::query(format!("invalid year {year}")))?;
        debug_assert_eq!(first.year(), last.year());

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReservationRow> = reservations::table
            .filter(
                reservations::boat_id
                    .eq(boat_id.as_uuid())
                    .and(reservations::date.between(first, last))
                    .and(reservations::status.ne_all(TERMINAL_STATUSES)),
            )
            .order(reservations::date)
            .select(ReservationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_reservations(rows)
    }

    async fn list_active_dated_before(
        &self,
        before: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReservationRow> = reservations::table
            .filter(
                reservations::date
                    .lt(before)
                    .and(reservations::status.ne_all(TERMINAL_STATUSES)),
            )
            .order(reservations::date)
            .select(ReservationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_reservations(rows)
    }

    async fn list_active_dated_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ReservationRow> = reservations::table
            .filter(
                reservations::date
                    .between(from, to)
                    .and(reservations::status.ne_all(TERMINAL_STATUSES)),
            )
            .order(reservations::date)
            .select(ReservationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_reservations(rows)
    }

    async fn transition_status(
        &self,
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<bool, ReservationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            reservations::table.filter(
                reservations::id
                    .eq(id.as_uuid())
                    .and(reservations::status.eq(from.as_str())),
            ),
        )
        .set(reservations::status.eq(to.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete_restoring_quota(
        &self,
        id: ReservationId,
    ) -> Result<Reservation, ReservationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let reservation_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let row: Option<ReservationRow> = reservations::table
                    .filter(reservations::id.eq(reservation_id))
                    .select(ReservationRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let row =
                    row.ok_or(TxError::Abort(ReservationStoreError::ReservationMissing))?;
                let reservation = row_to_reservation(row).map_err(TxError::Abort)?;

                // Preconditions re-checked on the locked row: a confirmation
                // racing this delete cannot let a confirmed booking vanish.
                if matches!(
                    reservation.status(),
                    ReservationStatus::Confirmed | ReservationStatus::Legacy
                ) {
                    return Err(TxError::Abort(ReservationStoreError::NotDeletable {
                        status: reservation.status(),
                    }));
                }

                if !reservation.quota_restored() {
                    credit_quota(
                        conn,
                        *reservation.user_id().as_uuid(),
                        reservation.kind(),
                    )
                    .await?;
                }

                diesel::delete(reservations::table.filter(reservations::id.eq(reservation_id)))
                    .execute(conn)
                    .await?;

                Ok(reservation)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn archive_restoring_quota(
        &self,
        id: ReservationId,
    ) -> Result<bool, ReservationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let reservation_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let row: Option<ReservationRow> = reservations::table
                    .filter(reservations::id.eq(reservation_id))
                    .select(ReservationRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                // Already deleted or already terminal: nothing to do, and
                // saying so keeps the sweep idempotent.
                let Some(row) = row else {
                    return Ok(false);
                };
                let reservation = row_to_reservation(row).map_err(TxError::Abort)?;
                if !reservation.is_active() {
                    return Ok(false);
                }

                diesel::update(reservations::table.filter(reservations::id.eq(reservation_id)))
                    .set((
                        reservations::status.eq(ReservationStatus::Legacy.as_str()),
                        reservations::quota_restored.eq(true),
                    ))
                    .execute(conn)
                    .await?;

                if !reservation.quota_restored() {
                    credit_quota(
                        conn,
                        *reservation.user_id().as_uuid(),
                        reservation.kind(),
                    )
                    .await?;
                }

                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }
}
