//! SchoolConnect Model
//!
//! Plain data types shared by every layer of the club leadership manager.
//!
//! # Core Concepts
//!
//! - [`ClubId`] / [`UserId`]: Opaque UUID-backed identifiers
//! - [`Role`]: Closed role enumeration with a total rank order
//! - [`Club`]: Club record; source of truth for "who is president"
//! - [`Membership`]: (club, user) relation; source of truth for "what can this user do"
//!
//! # Example
//!
//! ```rust,ignore
//! use sc_model::{Club, ClubId, NewClub, Role};
//!
//! let club = Club::unclaimed(ClubId::new(), NewClub::new("Chess Club"), chrono::Utc::now());
//! assert!(!club.claimed);
//! assert!("vice_president".parse::<Role>().is_ok());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod club;
mod id;
mod membership;
mod role;

pub use club::{Club, ClubProfile, NewClub};
pub use id::{ClubId, UserId};
pub use membership::Membership;
pub use role::{Role, RoleParseError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn claimed_club_matches_president_membership() {
        let alice = UserId::new();
        let mut club = Club::unclaimed(ClubId::new(), NewClub::new("Robotics"), Utc::now());
        club.president = Some(alice);
        club.claimed = true;

        let membership = Membership::new(club.id, alice, Role::President, Utc::now());

        assert!(club.is_consistent());
        assert!(club.is_president(membership.user_id));
        assert!(membership.is_president());
    }
}
