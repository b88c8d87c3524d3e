//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic;
//! the one exception worth naming is the reservation store, which owns the
//! *transactional* discipline (row locks, conditional updates) the domain
//! contracts require.

pub mod persistence;
