//! Reservation entity, closed lifecycle enums, and the transition rules.
//!
//! All day arithmetic happens in the boat's home timezone so that every
//! member sees the same reservation day regardless of where they call from.
//! Statuses and kinds are closed sets; adapters must parse them with
//! [`std::str::FromStr`] and reject anything outside the set.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{BoatId, UserId};

/// Trailing period before the reservation day during which the owner must
/// explicitly confirm.
pub const CONFIRMATION_WINDOW_DAYS: i64 = 7;

/// Timezone governing what "today" means for reservation days.
pub const BOAT_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

/// Stable reservation identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Generate a new random [`ReservationId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Quota-backed reservation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationKind {
    Standard,
    Substitution,
    Contingency,
}

impl ReservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Substitution => "substitution",
            Self::Contingency => "contingency",
        }
    }
}

impl fmt::Display for ReservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`ReservationKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReservationKindError {
    pub input: String,
}

impl fmt::Display for ParseReservationKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid reservation kind: {}", self.input)
    }
}

impl std::error::Error for ParseReservationKindError {}

impl FromStr for ReservationKind {
    type Err = ParseReservationKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "standard" => Ok(Self::Standard),
            "substitution" => Ok(Self::Substitution),
            "contingency" => Ok(Self::Contingency),
            _ => Err(ParseReservationKindError {
                input: value.to_owned(),
            }),
        }
    }
}

/// Lifecycle status of a reservation.
///
/// `Cancelled` and `Legacy` are terminal; queue resolution ignores both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Unconfirmed,
    Confirmed,
    Cancelled,
    Legacy,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Unconfirmed => "unconfirmed",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Legacy => "legacy",
        }
    }

    /// True for statuses that participate in the boat+date queue.
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Legacy)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`ReservationStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReservationStatusError {
    pub input: String,
}

impl fmt::Display for ParseReservationStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid reservation status: {}", self.input)
    }
}

impl std::error::Error for ParseReservationStatusError {}

impl FromStr for ReservationStatus {
    type Err = ParseReservationStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "unconfirmed" => Ok(Self::Unconfirmed),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ParseReservationStatusError {
                input: value.to_owned(),
            }),
        }
    }
}

/// Today's calendar day in the boat's timezone.
pub fn local_today(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&BOAT_TIMEZONE).date_naive()
}

/// Whole calendar days between today (boat timezone) and `date`.
///
/// A reservation for today yields 0; past dates yield negative values.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    (date - local_today(now)).num_days()
}

/// True once the reservation day has fully elapsed in the boat's timezone.
pub fn has_elapsed(date: NaiveDate, now: DateTime<Utc>) -> bool {
    local_today(now) > date
}

/// True when the date is close enough that the owner must confirm.
pub fn in_confirmation_window(date: NaiveDate, now: DateTime<Utc>) -> bool {
    days_until(date, now) <= CONFIRMATION_WINDOW_DAYS
}

/// Status assigned to a freshly created reservation.
///
/// Contingency bookings are same-day affairs; a confirmation step would be
/// meaningless, so they start out confirmed. Queued (non-primary)
/// reservations wait as pending until promotion makes them primary.
pub fn initial_status(
    kind: ReservationKind,
    is_primary: bool,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> ReservationStatus {
    if matches!(kind, ReservationKind::Contingency) {
        return ReservationStatus::Confirmed;
    }
    if !is_primary {
        return ReservationStatus::Pending;
    }
    if in_confirmation_window(date, now) {
        ReservationStatus::Unconfirmed
    } else {
        ReservationStatus::Pending
    }
}

/// Field bundle for constructing a [`Reservation`].
#[derive(Debug, Clone)]
pub struct ReservationDraft {
    pub id: ReservationId,
    pub user_id: UserId,
    pub boat_id: BoatId,
    pub date: NaiveDate,
    pub kind: ReservationKind,
    pub status: ReservationStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub quota_restored: bool,
}

/// A single-day booking of one boat by one member.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    id: ReservationId,
    user_id: UserId,
    boat_id: BoatId,
    date: NaiveDate,
    kind: ReservationKind,
    status: ReservationStatus,
    notes: String,
    created_at: DateTime<Utc>,
    quota_restored: bool,
}

impl Reservation {
    /// Assemble a reservation from already-validated parts.
    pub fn new(draft: ReservationDraft) -> Self {
        let ReservationDraft {
            id,
            user_id,
            boat_id,
            date,
            kind,
            status,
            notes,
            created_at,
            quota_restored,
        } = draft;
        Self {
            id,
            user_id,
            boat_id,
            date,
            kind,
            status,
            notes,
            created_at,
            quota_restored,
        }
    }

    pub const fn id(&self) -> ReservationId {
        self.id
    }

    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub const fn boat_id(&self) -> &BoatId {
        &self.boat_id
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn kind(&self) -> ReservationKind {
        self.kind
    }

    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn notes(&self) -> &str {
        self.notes.as_str()
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the quota unit consumed at creation has already been credited
    /// back. The restore must happen exactly once across explicit deletion
    /// and the archival sweep.
    pub const fn quota_restored(&self) -> bool {
        self.quota_restored
    }

    /// True while the reservation participates in queue resolution.
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// True once the reservation day has fully elapsed.
    pub fn has_elapsed(&self, now: DateTime<Utc>) -> bool {
        has_elapsed(self.date, now)
    }

    /// True when a primary pending reservation should become unconfirmed.
    pub fn eligible_for_promotion(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, ReservationStatus::Pending) && in_confirmation_window(self.date, now)
    }
}

#[cfg(test)]
mod tests {
    //! Transition-rule and day-arithmetic coverage.

    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn at_utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn kind_parsing_is_a_closed_set() {
        assert_eq!(
            "substitution".parse::<ReservationKind>(),
            Ok(ReservationKind::Substitution)
        );
        assert!("Weekly".parse::<ReservationKind>().is_err());
        assert!("Standard".parse::<ReservationKind>().is_err());
    }

    #[test]
    fn status_parsing_is_a_closed_set() {
        assert_eq!(
            "legacy".parse::<ReservationStatus>(),
            Ok(ReservationStatus::Legacy)
        );
        assert!("archived".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn today_follows_the_boat_timezone_not_utc() {
        // 02:00 UTC is still the previous evening in São Paulo (UTC-3).
        let now = at_utc(2026, 8, 4, 2);
        assert_eq!(local_today(now), date(2026, 8, 3));
        assert_eq!(days_until(date(2026, 8, 4), now), 1);
    }

    #[rstest]
    #[case(date(2026, 8, 10), 0)]
    #[case(date(2026, 8, 11), 1)]
    #[case(date(2026, 8, 17), 7)]
    #[case(date(2026, 8, 9), -1)]
    fn days_until_is_calendar_day_difference(#[case] day: NaiveDate, #[case] expected: i64) {
        let now = at_utc(2026, 8, 10, 15);
        assert_eq!(days_until(day, now), expected);
    }

    #[test]
    fn elapsed_only_after_the_full_day_has_passed() {
        let reservation_day = date(2026, 8, 10);
        assert!(!has_elapsed(reservation_day, at_utc(2026, 8, 10, 20)));
        // 02:00 UTC on the 11th is still the 10th in São Paulo.
        assert!(!has_elapsed(reservation_day, at_utc(2026, 8, 11, 2)));
        assert!(has_elapsed(reservation_day, at_utc(2026, 8, 11, 12)));
    }

    #[rstest]
    #[case(ReservationKind::Contingency, true, 0, ReservationStatus::Confirmed)]
    #[case(ReservationKind::Contingency, false, 30, ReservationStatus::Confirmed)]
    #[case(ReservationKind::Standard, false, 2, ReservationStatus::Pending)]
    #[case(ReservationKind::Standard, true, 7, ReservationStatus::Unconfirmed)]
    #[case(ReservationKind::Standard, true, 0, ReservationStatus::Unconfirmed)]
    #[case(ReservationKind::Standard, true, 8, ReservationStatus::Pending)]
    #[case(ReservationKind::Substitution, true, 3, ReservationStatus::Unconfirmed)]
    fn initial_status_follows_queue_position_and_lead_time(
        #[case] kind: ReservationKind,
        #[case] is_primary: bool,
        #[case] lead_days: i64,
        #[case] expected: ReservationStatus,
    ) {
        let now = at_utc(2026, 8, 10, 15);
        let day = local_today(now) + chrono::Duration::days(lead_days);
        assert_eq!(initial_status(kind, is_primary, day, now), expected);
    }

    #[test]
    fn promotion_requires_pending_inside_the_window() {
        let now = at_utc(2026, 8, 10, 15);
        let draft = ReservationDraft {
            id: ReservationId::random(),
            user_id: UserId::random(),
            boat_id: BoatId::random(),
            date: date(2026, 8, 12),
            kind: ReservationKind::Standard,
            status: ReservationStatus::Pending,
            notes: String::new(),
            created_at: now,
            quota_restored: false,
        };

        let pending = Reservation::new(draft.clone());
        assert!(pending.eligible_for_promotion(now));

        let confirmed = Reservation::new(ReservationDraft {
            status: ReservationStatus::Confirmed,
            ..draft.clone()
        });
        assert!(!confirmed.eligible_for_promotion(now));

        let far_out = Reservation::new(ReservationDraft {
            date: date(2026, 9, 20),
            ..draft
        });
        assert!(!far_out.eligible_for_promotion(now));
    }
}
