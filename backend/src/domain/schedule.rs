//! Boat+date queue resolution.
//!
//! The queue is never materialised as its own data structure; it is always
//! recomputed from the fetched reservation set, which keeps the ordering
//! rules in one restartable, side-effect-free place.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{BoatId, Reservation};

/// Order the active reservations of one boat+date into their queue.
///
/// Cancelled and legacy reservations never take part. Earliest creation wins;
/// identical creation timestamps (clock granularity collisions) fall back to
/// reservation id so the order stays deterministic.
pub fn resolve_queue(reservations: Vec<Reservation>) -> Vec<Reservation> {
    let mut queue: Vec<Reservation> = reservations.into_iter().filter(Reservation::is_active).collect();
    queue.sort_by_key(|r| (r.created_at(), r.id()));
    queue
}

/// The reservation currently occupying the boat+date, if any.
pub fn primary_of(queue: &[Reservation]) -> Option<&Reservation> {
    queue.first()
}

/// Partition a mixed batch by (boat, date) and yield each group's primary.
///
/// Used by the archival sweep so the primary check over the whole candidate
/// window costs one grouping pass instead of one queue query per reservation.
pub fn primaries_by_boat_date(reservations: Vec<Reservation>) -> Vec<Reservation> {
    let mut primaries: HashMap<(BoatId, NaiveDate), Reservation> = HashMap::new();

    for reservation in reservations.into_iter().filter(Reservation::is_active) {
        let key = (*reservation.boat_id(), reservation.date());
        match primaries.entry(key) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(reservation);
            }
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                let current = slot.get();
                if (reservation.created_at(), reservation.id())
                    < (current.created_at(), current.id())
                {
                    slot.insert(reservation);
                }
            }
        }
    }

    primaries.into_values().collect()
}
