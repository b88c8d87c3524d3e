//! User data model and quota counters.
//!
//! Quota counters are read-only here; they are mutated exclusively by the
//! reservation store's locked check-and-deduct / guarded-restore
//! transactions, never written directly by adapters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{BoatId, ReservationKind};

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Authorisation role attached to the session principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    /// Admins may act on reservations they do not own.
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`Role`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    pub input: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid role: {}", self.input)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError {
                input: value.to_owned(),
            }),
        }
    }
}

/// Validation errors returned by [`User::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    NegativeQuota { field: &'static str },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name must not be empty"),
            Self::EmptyEmail => write!(f, "user email must not be empty"),
            Self::NegativeQuota { field } => {
                write!(f, "{field} must not be negative")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Field bundle for constructing a [`User`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub boat_id: Option<BoatId>,
    pub standard_quota: i32,
    pub substitution_quota: i32,
    pub contingency_quota: i32,
}

/// A registered member of the shared-boat group.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    boat_id: Option<BoatId>,
    standard_quota: u32,
    substitution_quota: u32,
    contingency_quota: u32,
}

impl User {
    /// Validate and construct a user from stored fields.
    ///
    /// Counters arrive as `i32` straight from storage; a negative value means
    /// the ledger discipline was violated somewhere and is rejected here
    /// rather than silently clamped.
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            id,
            name,
            email,
            role,
            boat_id,
            standard_quota,
            substitution_quota,
            contingency_quota,
        } = draft;

        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }

        let standard_quota = quota_counter(standard_quota, "standard quota")?;
        let substitution_quota = quota_counter(substitution_quota, "substitution quota")?;
        let contingency_quota = quota_counter(contingency_quota, "contingency quota")?;

        Ok(Self {
            id,
            name,
            email,
            role,
            boat_id,
            standard_quota,
            substitution_quota,
            contingency_quota,
        })
    }

    pub const fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub const fn boat_id(&self) -> Option<&BoatId> {
        self.boat_id.as_ref()
    }

    /// Remaining units for the given reservation kind.
    pub const fn quota_for(&self, kind: ReservationKind) -> u32 {
        match kind {
            ReservationKind::Standard => self.standard_quota,
            ReservationKind::Substitution => self.substitution_quota,
            ReservationKind::Contingency => self.contingency_quota,
        }
    }

    /// True iff at least one unit of the given kind remains.
    pub const fn has_quota(&self, kind: ReservationKind) -> bool {
        self.quota_for(kind) > 0
    }
}

fn quota_counter(value: i32, field: &'static str) -> Result<u32, UserValidationError> {
    u32::try_from(value).map_err(|_| UserValidationError::NegativeQuota { field })
}
