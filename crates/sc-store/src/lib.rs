//! SchoolConnect Store
//!
//! Persistence seam for clubs and memberships.
//!
//! # Core Concepts
//!
//! - [`ClubStore`]: Read access plus [`ClubStore::begin`] for a unit of work
//! - [`StoreTransaction`]: Conditional writes scoped to one atomic unit;
//!   dropped without [`StoreTransaction::commit`] it rolls back
//! - [`InMemoryStore`]: Serializing in-process implementation
//! - `PgStore` (feature `postgres`): PostgreSQL implementation on sqlx
//!
//! The compare-and-set primitive [`StoreTransaction::set_president_if`] is
//! the concurrency control for claims and transfers: callers decide success
//! from its result, never from an earlier read.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;
mod store;

pub use error::StoreError;
pub use memory::{InMemoryStore, InMemoryTransaction};
#[cfg(feature = "postgres")]
pub use postgres::{PgStore, PgStoreTransaction, SCHEMA};
pub use store::{ClubStore, StoreTransaction};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
