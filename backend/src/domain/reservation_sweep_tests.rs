//! Tests for the archival sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use super::*;
use crate::domain::ports::MockReservationStore;
use crate::domain::{
    BoatId, Reservation, ReservationDraft, ReservationId, ReservationKind, UserId,
};

struct FrozenClock(DateTime<Utc>);

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 15:00 UTC is midday in São Paulo; local today is 2026-08-10.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 10, 15, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn today_plus(days: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 10).expect("valid date") + Duration::days(days)
}

fn reservation_fixture(
    boat_id: BoatId,
    date: NaiveDate,
    kind: ReservationKind,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
) -> Reservation {
    Reservation::new(ReservationDraft {
        id: ReservationId::random(),
        user_id: UserId::random(),
        boat_id,
        date,
        kind,
        status,
        notes: String::new(),
        created_at,
        quota_restored: false,
    })
}

fn with_status(reservation: &Reservation, status: ReservationStatus) -> Reservation {
    Reservation::new(ReservationDraft {
        id: reservation.id(),
        user_id: *reservation.user_id(),
        boat_id: *reservation.boat_id(),
        date: reservation.date(),
        kind: reservation.kind(),
        status,
        notes: reservation.notes().to_owned(),
        created_at: reservation.created_at(),
        quota_restored: reservation.quota_restored(),
    })
}

fn with_quota_restored(reservation: &Reservation) -> Reservation {
    Reservation::new(ReservationDraft {
        id: reservation.id(),
        user_id: *reservation.user_id(),
        boat_id: *reservation.boat_id(),
        date: reservation.date(),
        kind: reservation.kind(),
        status: reservation.status(),
        notes: reservation.notes().to_owned(),
        created_at: reservation.created_at(),
        quota_restored: true,
    })
}

/// In-memory store that honours the port's transactional contracts, used to
/// observe end state across repeated sweep runs.
#[derive(Default)]
struct InMemoryStore {
    reservations: Mutex<HashMap<ReservationId, Reservation>>,
    quotas: Mutex<HashMap<(UserId, ReservationKind), i32>>,
}

impl InMemoryStore {
    fn seed(&self, reservation: Reservation, remaining_quota: i32) {
        self.quotas
            .lock()
            .expect("quotas mutex")
            .insert((*reservation.user_id(), reservation.kind()), remaining_quota);
        self.reservations
            .lock()
            .expect("reservations mutex")
            .insert(reservation.id(), reservation);
    }

    fn status_of(&self, id: ReservationId) -> Option<ReservationStatus> {
        self.reservations
            .lock()
            .expect("reservations mutex")
            .get(&id)
            .map(Reservation::status)
    }

    fn quota_of(&self, user_id: &UserId, kind: ReservationKind) -> i32 {
        self.quotas
            .lock()
            .expect("quotas mutex")
            .get(&(*user_id, kind))
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReservationStore for InMemoryStore {
    async fn insert_with_quota_deduction(
        &self,
        reservation: &Reservation,
    ) -> Result<(), ReservationStoreError> {
        let mut quotas = self.quotas.lock().expect("quotas mutex");
        let counter = quotas
            .get_mut(&(*reservation.user_id(), reservation.kind()))
            .ok_or(ReservationStoreError::UserMissing)?;
        if *counter < 1 {
            return Err(ReservationStoreError::InsufficientQuota);
        }
        *counter -= 1;
        self.reservations
            .lock()
            .expect("reservations mutex")
            .insert(reservation.id(), reservation.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, ReservationStoreError> {
        Ok(self
            .reservations
            .lock()
            .expect("reservations mutex")
            .get(&id)
            .cloned())
    }

    async fn list_active_for_boat_date(
        &self,
        boat_id: &BoatId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        Ok(self
            .reservations
            .lock()
            .expect("reservations mutex")
            .values()
            .filter(|r| r.is_active() && r.boat_id() == boat_id && r.date() == date)
            .cloned()
            .collect())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        Ok(self
            .reservations
            .lock()
            .expect("reservations mutex")
            .values()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn list_active_for_boat_year(
        &self,
        boat_id: &BoatId,
        year: i32,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        use chrono::Datelike;
        Ok(self
            .reservations
            .lock()
            .expect("reservations mutex")
            .values()
            .filter(|r| r.is_active() && r.boat_id() == boat_id && r.date().year() == year)
            .cloned()
            .collect())
    }

    async fn list_active_dated_before(
        &self,
        before: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        Ok(self
            .reservations
            .lock()
            .expect("reservations mutex")
            .values()
            .filter(|r| r.is_active() && r.date() < before)
            .cloned()
            .collect())
    }

    async fn list_active_dated_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationStoreError> {
        Ok(self
            .reservations
            .lock()
            .expect("reservations mutex")
            .values()
            .filter(|r| r.is_active() && r.date() >= from && r.date() <= to)
            .cloned()
            .collect())
    }

    async fn transition_status(
        &self,
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<bool, ReservationStoreError> {
        let mut reservations = self.reservations.lock().expect("reservations mutex");
        match reservations.get(&id) {
            Some(existing) if existing.status() == from => {
                let updated = with_status(existing, to);
                reservations.insert(id, updated);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_restoring_quota(
        &self,
        id: ReservationId,
    ) -> Result<Reservation, ReservationStoreError> {
        let mut reservations = self.reservations.lock().expect("reservations mutex");
        let existing = reservations
            .get(&id)
            .cloned()
            .ok_or(ReservationStoreError::ReservationMissing)?;
        if matches!(
            existing.status(),
            ReservationStatus::Confirmed | ReservationStatus::Legacy
        ) {
            return Err(ReservationStoreError::NotDeletable {
                status: existing.status(),
            });
        }
        if !existing.quota_restored() {
            *self
                .quotas
                .lock()
                .expect("quotas mutex")
                .entry((*existing.user_id(), existing.kind()))
                .or_default() += 1;
        }
        reservations.remove(&id);
        Ok(existing)
    }

    async fn archive_restoring_quota(
        &self,
        id: ReservationId,
    ) -> Result<bool, ReservationStoreError> {
        let mut reservations = self.reservations.lock().expect("reservations mutex");
        let Some(existing) = reservations.get(&id).cloned() else {
            return Ok(false);
        };
        if !existing.is_active() {
            return Ok(false);
        }
        let mut archived = with_status(&existing, ReservationStatus::Legacy);
        if !archived.quota_restored() {
            *self
                .quotas
                .lock()
                .expect("quotas mutex")
                .entry((*archived.user_id(), archived.kind()))
                .or_default() += 1;
            archived = with_quota_restored(&archived);
        }
        reservations.insert(id, archived);
        Ok(true)
    }
}

fn sweep_over(store: Arc<InMemoryStore>) -> ReservationSweep<InMemoryStore> {
    ReservationSweep::new(store, Arc::new(FrozenClock(now())))
}

#[tokio::test]
async fn archives_elapsed_reservations_and_restores_quota_exactly_once() {
    let store = Arc::new(InMemoryStore::default());
    let elapsed = reservation_fixture(
        BoatId::random(),
        today_plus(-2),
        ReservationKind::Standard,
        ReservationStatus::Confirmed,
        now() - Duration::days(10),
    );
    let id = elapsed.id();
    let user_id = *elapsed.user_id();
    store.seed(elapsed, 0);

    let sweep = sweep_over(store.clone());

    let first = sweep.run_once().await.expect("first run succeeds");
    assert_eq!(first.archived, 1);
    assert_eq!(store.status_of(id), Some(ReservationStatus::Legacy));
    assert_eq!(store.quota_of(&user_id, ReservationKind::Standard), 1);

    // Immediately re-running performs no further transitions or credits.
    let second = sweep.run_once().await.expect("second run succeeds");
    assert_eq!(second, SweepOutcome::default());
    assert_eq!(store.quota_of(&user_id, ReservationKind::Standard), 1);
}

#[tokio::test]
async fn promotes_only_the_primary_of_each_due_boat_date() {
    let store = Arc::new(InMemoryStore::default());
    let boat_id = BoatId::random();
    let primary = reservation_fixture(
        boat_id,
        today_plus(3),
        ReservationKind::Standard,
        ReservationStatus::Pending,
        now() - Duration::hours(5),
    );
    let queued = reservation_fixture(
        boat_id,
        today_plus(3),
        ReservationKind::Substitution,
        ReservationStatus::Pending,
        now() - Duration::hours(1),
    );
    let far_out = reservation_fixture(
        BoatId::random(),
        today_plus(20),
        ReservationKind::Standard,
        ReservationStatus::Pending,
        now() - Duration::hours(5),
    );
    let (primary_id, queued_id, far_out_id) = (primary.id(), queued.id(), far_out.id());
    store.seed(primary, 0);
    store.seed(queued, 0);
    store.seed(far_out, 0);

    let sweep = sweep_over(store.clone());
    let outcome = sweep.run_once().await.expect("run succeeds");

    assert_eq!(outcome.promoted, 1);
    assert_eq!(
        store.status_of(primary_id),
        Some(ReservationStatus::Unconfirmed)
    );
    // Queued reservations wait for promotion-on-deletion, never the sweep.
    assert_eq!(store.status_of(queued_id), Some(ReservationStatus::Pending));
    assert_eq!(store.status_of(far_out_id), Some(ReservationStatus::Pending));

    let again = sweep.run_once().await.expect("second run succeeds");
    assert_eq!(again.promoted, 0);
}

#[tokio::test]
async fn already_unconfirmed_or_confirmed_primaries_are_left_alone() {
    let store = Arc::new(InMemoryStore::default());
    let confirmed = reservation_fixture(
        BoatId::random(),
        today_plus(1),
        ReservationKind::Contingency,
        ReservationStatus::Confirmed,
        now() - Duration::hours(2),
    );
    let unconfirmed = reservation_fixture(
        BoatId::random(),
        today_plus(2),
        ReservationKind::Standard,
        ReservationStatus::Unconfirmed,
        now() - Duration::hours(2),
    );
    let (confirmed_id, unconfirmed_id) = (confirmed.id(), unconfirmed.id());
    store.seed(confirmed, 0);
    store.seed(unconfirmed, 0);

    let sweep = sweep_over(store.clone());
    let outcome = sweep.run_once().await.expect("run succeeds");

    assert_eq!(outcome, SweepOutcome::default());
    assert_eq!(
        store.status_of(confirmed_id),
        Some(ReservationStatus::Confirmed)
    );
    assert_eq!(
        store.status_of(unconfirmed_id),
        Some(ReservationStatus::Unconfirmed)
    );
}

#[tokio::test]
async fn one_failing_item_does_not_abort_the_batch() {
    let boat_id = BoatId::random();
    let failing = reservation_fixture(
        boat_id,
        today_plus(-1),
        ReservationKind::Standard,
        ReservationStatus::Pending,
        now() - Duration::days(3),
    );
    let healthy = reservation_fixture(
        boat_id,
        today_plus(-1),
        ReservationKind::Standard,
        ReservationStatus::Pending,
        now() - Duration::days(2),
    );
    let failing_id = failing.id();

    let mut store = MockReservationStore::new();
    let batch = vec![failing, healthy];
    store
        .expect_list_active_dated_before()
        .returning(move |_| Ok(batch.clone()));
    store
        .expect_archive_restoring_quota()
        .times(2)
        .returning(move |id| {
            if id == failing_id {
                Err(ReservationStoreError::query("deadlock detected"))
            } else {
                Ok(true)
            }
        });
    store
        .expect_list_active_dated_between()
        .returning(|_, _| Ok(Vec::new()));

    let sweep = ReservationSweep::new(Arc::new(store), Arc::new(FrozenClock(now())));
    let outcome = sweep.run_once().await.expect("run completes");

    assert_eq!(outcome.archived, 1);
    assert_eq!(outcome.skipped, 1);
}

#[tokio::test]
async fn listing_failure_fails_the_run() {
    let mut store = MockReservationStore::new();
    store
        .expect_list_active_dated_before()
        .returning(|_| Err(ReservationStoreError::connection("pool exhausted")));

    let sweep = ReservationSweep::new(Arc::new(store), Arc::new(FrozenClock(now())));
    let error = sweep.run_once().await.expect_err("listing failed");

    assert!(matches!(error, ReservationStoreError::Connection { .. }));
}
