//! Boat data model.
//!
//! Boats are read-only to the reservation engine; capacity matters to member
//! assignment, not to day-level occupancy.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable boat identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoatId(Uuid);

impl BoatId {
    /// Generate a new random [`BoatId`].
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

impl fmt::Display for BoatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors returned by [`Boat::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoatValidationError {
    EmptyName,
    ZeroCapacity,
}

impl fmt::Display for BoatValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "boat name must not be empty"),
            Self::ZeroCapacity => write!(f, "boat capacity must be positive"),
        }
    }
}

impl std::error::Error for BoatValidationError {}

/// A shared boat members reserve by the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boat {
    id: BoatId,
    name: String,
    capacity: u32,
}

impl Boat {
    /// Validate and construct a boat from stored fields.
    pub fn new(id: BoatId, name: String, capacity: i32) -> Result<Self, BoatValidationError> {
        if name.trim().is_empty() {
            return Err(BoatValidationError::EmptyName);
        }
        let capacity = u32::try_from(capacity)
            .ok()
            .filter(|c| *c > 0)
            .ok_or(BoatValidationError::ZeroCapacity)?;

        Ok(Self { id, name, capacity })
    }

    pub const fn id(&self) -> &BoatId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub const fn capacity(&self) -> u32 {
        self.capacity
    }
}
