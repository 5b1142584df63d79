//! Club membership rows

use crate::id::{ClubId, UserId};
use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// (club, user) relation carrying a role; unique per pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub club_id: ClubId,
    pub user_id: UserId,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    /// Create membership row
    #[inline]
    #[must_use]
    pub fn new(club_id: ClubId, user_id: UserId, role: Role, joined_at: DateTime<Utc>) -> Self {
        Self {
            club_id,
            user_id,
            role,
            joined_at,
        }
    }

    /// Whether this row holds the president role
    #[inline]
    #[must_use]
    pub fn is_president(&self) -> bool {
        self.role == Role::President
    }
}
