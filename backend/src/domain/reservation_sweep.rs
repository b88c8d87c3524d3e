//! Time-driven reservation maintenance.
//!
//! The sweep archives reservations whose day has fully elapsed (restoring
//! their quota exactly once) and promotes due primaries into the
//! confirmation window. Every transition is individually idempotent, so the
//! sweep may overlap with user actions or with itself; a failed item is
//! logged and skipped rather than aborting the batch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Days;
use mockable::Clock;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::domain::ports::{ReservationStore, ReservationStoreError, SweepCommand, SweepOutcome};
use crate::domain::{local_today, schedule, Error, ReservationStatus, CONFIRMATION_WINDOW_DAYS};

/// Interval between scheduled sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Background worker applying time-driven reservation transitions.
pub struct ReservationSweep<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> ReservationSweep<S> {
    /// Create a sweep over the reservation store.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

impl<S> ReservationSweep<S>
where
    S: ReservationStore,
{
    /// Run one sweep pass: archive elapsed reservations, then promote due
    /// primaries. Fails only when a candidate batch cannot be listed at all;
    /// per-item failures are counted and skipped.
    pub async fn run_once(&self) -> Result<SweepOutcome, ReservationStoreError> {
        let mut outcome = SweepOutcome::default();
        self.archive_elapsed(&mut outcome).await?;
        self.promote_due(&mut outcome).await?;
        Ok(outcome)
    }

    async fn archive_elapsed(
        &self,
        outcome: &mut SweepOutcome,
    ) -> Result<(), ReservationStoreError> {
        let today = local_today(self.clock.utc());
        let elapsed = self.store.list_active_dated_before(today).await?;

        for reservation in elapsed {
            match self.store.archive_restoring_quota(reservation.id()).await {
                // `false` means another actor already archived or removed it.
                Ok(archived) => outcome.archived += usize::from(archived),
                Err(error) => {
                    warn!(
                        reservation_id = %reservation.id(),
                        %error,
                        "failed to archive elapsed reservation; skipping"
                    );
                    outcome.skipped += 1;
                }
            }
        }

        Ok(())
    }

    async fn promote_due(&self, outcome: &mut SweepOutcome) -> Result<(), ReservationStoreError> {
        let now = self.clock.utc();
        let today = local_today(now);
        let horizon = today
            .checked_add_days(Days::new(CONFIRMATION_WINDOW_DAYS.unsigned_abs()))
            .unwrap_or(today);

        // One windowed query; primaries are computed by grouping in memory
        // rather than re-resolving the queue per candidate.
        let window = self.store.list_active_dated_between(today, horizon).await?;

        for primary in schedule::primaries_by_boat_date(window) {
            if !primary.eligible_for_promotion(now) {
                continue;
            }

            match self
                .store
                .transition_status(
                    primary.id(),
                    ReservationStatus::Pending,
                    ReservationStatus::Unconfirmed,
                )
                .await
            {
                Ok(promoted) => outcome.promoted += usize::from(promoted),
                Err(error) => {
                    warn!(
                        reservation_id = %primary.id(),
                        %error,
                        "failed to promote due reservation; skipping"
                    );
                    outcome.skipped += 1;
                }
            }
        }

        Ok(())
    }

    /// Run the sweep eagerly once, then on [`SWEEP_INTERVAL`], until the
    /// shutdown signal flips. A long-idle deployment therefore catches up
    /// immediately at startup instead of waiting a full interval.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(outcome) => info!(
                            archived = outcome.archived,
                            promoted = outcome.promoted,
                            skipped = outcome.skipped,
                            "reservation sweep completed"
                        ),
                        Err(sweep_error) => error!(
                            error = %sweep_error,
                            "reservation sweep run failed"
                        ),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("reservation sweep stopped");
    }
}

#[async_trait]
impl<S> SweepCommand for ReservationSweep<S>
where
    S: ReservationStore,
{
    async fn run_sweep(&self) -> Result<SweepOutcome, Error> {
        self.run_once().await.map_err(|error| match error {
            ReservationStoreError::Connection { message } => {
                Error::service_unavailable(format!("reservation store unavailable: {message}"))
            }
            other => Error::internal(format!("reservation sweep failed: {other}")),
        })
    }
}

#[cfg(test)]
#[path = "reservation_sweep_tests.rs"]
mod tests;
