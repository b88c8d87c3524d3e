//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. The reservation store additionally owns
//!   the transactional discipline (row locks, conditional updates) that the
//!   domain contracts require; no other business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: Connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.

pub(crate) mod diesel_error_mapping;
mod diesel_boat_repository;
mod diesel_reservation_store;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_boat_repository::DieselBoatRepository;
pub use diesel_reservation_store::DieselReservationStore;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
