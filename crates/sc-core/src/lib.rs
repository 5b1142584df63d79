//! SchoolConnect Core - Club Leadership Manager
//!
//! Owns every transition of club membership and leadership:
//! - Claiming an unclaimed club (first president)
//! - Transferring the presidency to another member
//! - Promoting and demoting members below president
//! - Joining and leaving clubs
//! - Recording committed transitions in a hash-chained audit log
//!
//! At every commit point a claimed club has exactly one president, and that
//! president holds the club's only president membership.
//!
//! # Example
//!
//! ```rust,ignore
//! use sc_core::{ClubManager, NewClub, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ClubManager::in_memory();
//! let club = manager.create_club(NewClub::new("Chess Club")).await?;
//!
//! let alice = UserId::new();
//! manager.claim(club.id, alice, true).await?;
//! assert_eq!(manager.club(club.id).await?.president, Some(alice));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod audit;
pub mod config;
pub mod error;
pub mod invariants;
pub mod manager;

// Re-exports for convenience
pub use audit::{AuditAction, AuditError, AuditEvent, AuditLog};
pub use config::{ConfigError, ManagerConfig};
pub use error::{
    ClaimError, ClubError, CreateClubError, ErrorKind, JoinError, LeaveError, QueryError,
    SetRoleError, TransferError,
};
pub use invariants::{check_club, InvariantViolation};
pub use manager::ClubManager;
pub use sc_model::{Club, ClubId, ClubProfile, Membership, NewClub, Role, UserId};
pub use sc_store::{ClubStore, InMemoryStore, StoreError, StoreTransaction};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the club manager
    pub use crate::{
        ClubError, ClubId, ClubManager, ErrorKind, InMemoryStore, ManagerConfig, NewClub, Role,
        UserId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
