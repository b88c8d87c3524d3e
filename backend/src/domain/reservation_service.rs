//! Reservation coordinator service.
//!
//! Implements the reservation driving ports over the transactional store and
//! the boat repository. The service sequences validation, queue resolution,
//! and the store's atomic operations; it never mutates quota counters itself.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    BoatPersistenceError, BoatRepository, Caller, CreateReservationRequest, ReservationCommand,
    ReservationPayload, ReservationQuery, ReservationStore, ReservationStoreError,
};
use crate::domain::{
    days_until, initial_status, schedule, BoatId, Error, Reservation, ReservationDraft,
    ReservationId, ReservationStatus, UserId,
};

/// Map store errors to domain errors.
fn map_store_error(error: ReservationStoreError) -> Error {
    match error {
        ReservationStoreError::Connection { message } => {
            Error::service_unavailable(format!("reservation store unavailable: {message}"))
        }
        ReservationStoreError::Query { message } => {
            Error::internal(format!("reservation store error: {message}"))
        }
        ReservationStoreError::InsufficientQuota => {
            Error::insufficient_quota("no remaining quota for this reservation kind")
        }
        ReservationStoreError::UserMissing => Error::not_found("user not found"),
        ReservationStoreError::ReservationMissing => Error::not_found("reservation not found"),
        ReservationStoreError::NotDeletable { status } => deletion_rejection(status),
    }
}

/// Map boat repository errors to domain errors.
fn map_boat_error(error: BoatPersistenceError) -> Error {
    match error {
        BoatPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("boat repository unavailable: {message}"))
        }
        BoatPersistenceError::Query { message } => {
            Error::internal(format!("boat repository error: {message}"))
        }
    }
}

/// The distinguishable rejection for an undeletable status.
fn deletion_rejection(status: ReservationStatus) -> Error {
    match status {
        ReservationStatus::Confirmed => {
            Error::cannot_delete_confirmed("confirmed reservations cannot be deleted")
        }
        ReservationStatus::Legacy => {
            Error::cannot_delete_legacy("archived reservations are read-only")
        }
        other => Error::internal(format!(
            "reservation with status {other} unexpectedly refused deletion"
        )),
    }
}

/// Coordinator implementing the reservation command and query ports.
#[derive(Clone)]
pub struct ReservationService<S, B> {
    store: Arc<S>,
    boats: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<S, B> ReservationService<S, B> {
    /// Create a new service over the reservation store and boat repository.
    pub fn new(store: Arc<S>, boats: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            boats,
            clock,
        }
    }
}

impl<S, B> ReservationService<S, B>
where
    S: ReservationStore,
    B: BoatRepository,
{
    /// Promote the current primary of a boat+date when it is a pending
    /// reservation inside the confirmation window. Used after a deletion so
    /// the next queued member learns they are up.
    async fn promote_new_primary(&self, boat_id: &BoatId, date: NaiveDate) -> Result<(), Error> {
        let remaining = self
            .store
            .list_active_for_boat_date(boat_id, date)
            .await
            .map_err(map_store_error)?;

        let queue = schedule::resolve_queue(remaining);
        let Some(primary) = schedule::primary_of(&queue) else {
            return Ok(());
        };

        if !primary.eligible_for_promotion(self.clock.utc()) {
            return Ok(());
        }

        let promoted = self
            .store
            .transition_status(
                primary.id(),
                ReservationStatus::Pending,
                ReservationStatus::Unconfirmed,
            )
            .await
            .map_err(map_store_error)?;

        if promoted {
            info!(
                reservation_id = %primary.id(),
                boat_id = %boat_id,
                %date,
                "promoted queued reservation to unconfirmed"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl<S, B> ReservationCommand for ReservationService<S, B>
where
    S: ReservationStore,
    B: BoatRepository,
{
    async fn create_reservation(
        &self,
        caller: Caller,
        request: CreateReservationRequest,
    ) -> Result<ReservationPayload, Error> {
        let now = self.clock.utc();
        if days_until(request.date, now) < 0 {
            return Err(Error::invalid_request(
                "reservation date must not be in the past",
            ));
        }

        self.boats
            .find_by_id(&request.boat_id)
            .await
            .map_err(map_boat_error)?
            .ok_or_else(|| Error::not_found(format!("boat {} not found", request.boat_id)))?;

        let existing = self
            .store
            .list_active_for_boat_date(&request.boat_id, request.date)
            .await
            .map_err(map_store_error)?;
        let is_primary = schedule::resolve_queue(existing).is_empty();

        let status = initial_status(request.kind, is_primary, request.date, now);
        let reservation = Reservation::new(ReservationDraft {
            id: ReservationId::random(),
            user_id: caller.user_id,
            boat_id: request.boat_id,
            date: request.date,
            kind: request.kind,
            status,
            notes: request.notes,
            created_at: now,
            quota_restored: false,
        });

        self.store
            .insert_with_quota_deduction(&reservation)
            .await
            .map_err(map_store_error)?;

        info!(
            reservation_id = %reservation.id(),
            user_id = %caller.user_id,
            boat_id = %reservation.boat_id(),
            date = %reservation.date(),
            kind = %reservation.kind(),
            status = %reservation.status(),
            "reservation created"
        );

        Ok(ReservationPayload::from(reservation))
    }

    async fn confirm_reservation(
        &self,
        caller: Caller,
        id: ReservationId,
    ) -> Result<ReservationPayload, Error> {
        let reservation = self
            .store
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("reservation {id} not found")))?;

        if !caller.may_act_on(reservation.user_id()) {
            return Err(Error::forbidden(
                "only the reservation owner or an admin may confirm",
            ));
        }

        if reservation.status() != ReservationStatus::Unconfirmed {
            return Err(Error::not_unconfirmed(format!(
                "reservation is {}, not awaiting confirmation",
                reservation.status()
            )));
        }

        let confirmed = self
            .store
            .transition_status(
                id,
                ReservationStatus::Unconfirmed,
                ReservationStatus::Confirmed,
            )
            .await
            .map_err(map_store_error)?;
        if !confirmed {
            // Another transition won the race between our read and the update.
            return Err(Error::not_unconfirmed(
                "reservation is no longer awaiting confirmation",
            ));
        }

        info!(reservation_id = %id, user_id = %caller.user_id, "reservation confirmed");

        let mut payload = ReservationPayload::from(reservation);
        payload.status = ReservationStatus::Confirmed;
        Ok(payload)
    }

    async fn delete_reservation(&self, caller: Caller, id: ReservationId) -> Result<(), Error> {
        let reservation = self
            .store
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("reservation {id} not found")))?;

        if !caller.may_act_on(reservation.user_id()) {
            return Err(Error::forbidden(
                "only the reservation owner or an admin may delete",
            ));
        }

        match reservation.status() {
            ReservationStatus::Confirmed | ReservationStatus::Legacy => {
                return Err(deletion_rejection(reservation.status()));
            }
            ReservationStatus::Pending
            | ReservationStatus::Unconfirmed
            | ReservationStatus::Cancelled => {}
        }

        // The store re-checks deletability on the locked row, so a racing
        // confirmation still cannot let a confirmed reservation slip out.
        let deleted = self
            .store
            .delete_restoring_quota(id)
            .await
            .map_err(map_store_error)?;

        info!(
            reservation_id = %id,
            user_id = %caller.user_id,
            boat_id = %deleted.boat_id(),
            date = %deleted.date(),
            "reservation deleted"
        );

        self.promote_new_primary(deleted.boat_id(), deleted.date())
            .await
    }
}

#[async_trait]
impl<S, B> ReservationQuery for ReservationService<S, B>
where
    S: ReservationStore,
    B: BoatRepository,
{
    async fn queue_for_boat_date(
        &self,
        boat_id: BoatId,
        date: NaiveDate,
    ) -> Result<Vec<ReservationPayload>, Error> {
        let reservations = self
            .store
            .list_active_for_boat_date(&boat_id, date)
            .await
            .map_err(map_store_error)?;

        Ok(schedule::resolve_queue(reservations)
            .into_iter()
            .map(ReservationPayload::from)
            .collect())
    }

    async fn reservations_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ReservationPayload>, Error> {
        let reservations = self
            .store
            .list_for_user(&user_id)
            .await
            .map_err(map_store_error)?;

        Ok(reservations
            .into_iter()
            .map(ReservationPayload::from)
            .collect())
    }

    async fn occupied_dates(
        &self,
        boat_id: BoatId,
        year: i32,
    ) -> Result<Vec<ReservationPayload>, Error> {
        let reservations = self
            .store
            .list_active_for_boat_year(&boat_id, year)
            .await
            .map_err(map_store_error)?;

        debug!(boat_id = %boat_id, year, count = reservations.len(), "resolved occupied dates");

        let mut primaries = schedule::primaries_by_boat_date(reservations);
        primaries.sort_by_key(Reservation::date);

        Ok(primaries.into_iter().map(ReservationPayload::from).collect())
    }
}

#[cfg(test)]
#[path = "reservation_service_tests.rs"]
mod tests;
