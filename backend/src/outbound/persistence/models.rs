//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{boats, reservations, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub boat_id: Option<Uuid>,
    pub standard_quota: i32,
    pub substitution_quota: i32,
    pub contingency_quota: i32,
    #[expect(dead_code, reason = "schema field for audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Quota counters selected under `FOR UPDATE` during check-and-deduct.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuotaCountersRow {
    pub standard_quota: i32,
    pub substitution_quota: i32,
    pub contingency_quota: i32,
}

/// Row struct for reading from the boats table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = boats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BoatRow {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    #[expect(dead_code, reason = "schema field for audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the reservations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReservationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub boat_id: Uuid,
    pub date: NaiveDate,
    pub kind: String,
    pub status: String,
    pub notes: String,
    pub quota_restored: bool,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating reservation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reservations)]
pub(crate) struct NewReservationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub boat_id: Uuid,
    pub date: NaiveDate,
    pub kind: &'a str,
    pub status: &'a str,
    pub notes: &'a str,
    pub quota_restored: bool,
    pub created_at: DateTime<Utc>,
}
