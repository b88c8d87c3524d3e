//! Port abstraction for boat persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Boat, BoatId};

/// Persistence errors raised by boat repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoatPersistenceError {
    /// Repository connection could not be established.
    #[error("boat repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("boat repository query failed: {message}")]
    Query { message: String },
}

impl BoatPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading boat records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoatRepository: Send + Sync {
    /// Fetch a boat by identifier.
    async fn find_by_id(&self, id: &BoatId) -> Result<Option<Boat>, BoatPersistenceError>;

    /// List every boat, name order.
    async fn list(&self) -> Result<Vec<Boat>, BoatPersistenceError>;
}
