//! PostgreSQL-backed `BoatRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BoatPersistenceError, BoatRepository};
use crate::domain::{Boat, BoatId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::BoatRow;
use super::pool::{DbPool, PoolError};
use super::schema::boats;

/// Diesel-backed implementation of the boat repository port.
#[derive(Clone)]
pub struct DieselBoatRepository {
    pool: DbPool,
}

impl DieselBoatRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BoatPersistenceError {
    map_basic_pool_error(error, BoatPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BoatPersistenceError {
    map_basic_diesel_error(
        error,
        BoatPersistenceError::query,
        BoatPersistenceError::connection,
    )
}

fn row_to_boat(row: BoatRow) -> Result<Boat, BoatPersistenceError> {
    Boat::new(BoatId::from_uuid(row.id), row.name, row.capacity)
        .map_err(|err| BoatPersistenceError::query(err.to_string()))
}

#[async_trait]
impl BoatRepository for DieselBoatRepository {
    async fn find_by_id(&self, id: &BoatId) -> Result<Option<Boat>, BoatPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = boats::table
            .filter(boats::id.eq(id.as_uuid()))
            .select(BoatRow::as_select())
            .first::<BoatRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_boat).transpose()
    }

    async fn list(&self) -> Result<Vec<Boat>, BoatPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BoatRow> = boats::table
            .order(boats::name)
            .select(BoatRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_boat).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion and error mapping coverage without a live database.

    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(name: &str, capacity: i32) -> BoatRow {
        let created_at = Utc
            .with_ymd_and_hms(2026, 8, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        BoatRow {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            capacity,
            created_at,
            updated_at: created_at,
        }
    }

    #[rstest]
    fn row_conversion_builds_a_domain_boat() {
        let boat = row_to_boat(row("Saudade", 8)).expect("valid row converts");
        assert_eq!(boat.name(), "Saudade");
        assert_eq!(boat.capacity(), 8);
    }

    #[rstest]
    fn row_conversion_rejects_invalid_capacity() {
        let error = row_to_boat(row("Saudade", 0)).expect_err("zero capacity should fail");
        assert!(matches!(error, BoatPersistenceError::Query { .. }));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let error = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(error, BoatPersistenceError::Query { .. }));
    }
}
