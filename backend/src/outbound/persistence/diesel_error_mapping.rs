//! Shared Diesel error mapping for the persistence adapters.
//!
//! Details are logged here and deliberately kept out of the mapped messages;
//! closed connections map to connection errors (retryable), everything else
//! to query failures.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into an adapter's connection error constructor.
pub(crate) fn map_basic_pool_error<E>(
    error: PoolError,
    connection: impl FnOnce(String) -> E,
) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => connection(message),
    }
}

/// Map common Diesel error variants into query/connection constructors.
pub(crate) fn map_basic_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    } else {
        debug!(%error, "diesel operation failed");
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}
