//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; regenerate or update them whenever a migration changes the
//! schema.

diesel::table! {
    /// Registered members with their per-kind quota counters.
    ///
    /// Quota columns are mutated only inside the reservation store's locked
    /// transactions; application code never writes them directly.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable member name.
        name -> Varchar,
        /// Contact address, unique per member.
        email -> Varchar,
        /// Authorisation role (`member` or `admin`).
        role -> Varchar,
        /// Boat the member is assigned to, if any.
        boat_id -> Nullable<Uuid>,
        /// Remaining standard reservation units. Never negative.
        standard_quota -> Int4,
        /// Remaining substitution reservation units. Never negative.
        substitution_quota -> Int4,
        /// Remaining contingency reservation units. Never negative.
        contingency_quota -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shared boats reservable by the day.
    boats (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Maximum number of assignable members.
        capacity -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Single-day reservations, one row per booking.
    ///
    /// Indexed by (boat_id, date) for queue resolution, by user_id for the
    /// member view, and by (status, date) for the sweep scans.
    reservations (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning member.
        user_id -> Uuid,
        /// Reserved boat.
        boat_id -> Uuid,
        /// Reserved calendar day in the boat's timezone.
        date -> Date,
        /// Closed kind set: `standard`, `substitution`, `contingency`.
        kind -> Varchar,
        /// Closed status set: `pending`, `unconfirmed`, `confirmed`,
        /// `cancelled`, `legacy`.
        status -> Varchar,
        /// Free-text note from the member.
        notes -> Text,
        /// Whether the consumed quota unit was already credited back.
        quota_restored -> Bool,
        /// Creation timestamp; sole queue ordering key (id breaks ties).
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(reservations -> users (user_id));
diesel::joinable!(reservations -> boats (boat_id));

diesel::allow_tables_to_appear_in_same_query!(users, boats, reservations);
