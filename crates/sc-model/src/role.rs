//! Club roles
//!
//! Roles form a closed set with a total rank order:
//! `member < officer < vice_president < president`.
//! String forms only exist at parse/serialize boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a user holds within a single club
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Plain member
    #[default]
    Member,
    /// Officer
    Officer,
    /// Vice president
    VicePresident,
    /// President; at most one per club
    President,
}

impl Role {
    /// Every role, lowest rank first
    pub const ALL: [Role; 4] = [
        Role::Member,
        Role::Officer,
        Role::VicePresident,
        Role::President,
    ];

    /// Numeric rank (member = 0)
    #[inline]
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Role::Member => 0,
            Role::Officer => 1,
            Role::VicePresident => 2,
            Role::President => 3,
        }
    }

    /// Officer, vice president or president
    #[inline]
    #[must_use]
    pub fn is_leadership(&self) -> bool {
        *self != Role::Member
    }

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Officer => "officer",
            Role::VicePresident => "vice_president",
            Role::President => "president",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown role string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "officer" => Ok(Role::Officer),
            "vice_president" => Ok(Role::VicePresident),
            "president" => Ok(Role::President),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn role_order_matches_rank() {
        assert!(Role::Member < Role::Officer);
        assert!(Role::Officer < Role::VicePresident);
        assert!(Role::VicePresident < Role::President);
        for pair in Role::ALL.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn role_parse_rejects_near_misses() {
        assert!("President".parse::<Role>().is_err());
        assert!("vice-president".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(
            "owner".parse::<Role>().unwrap_err(),
            RoleParseError("owner".to_string())
        );
    }

    #[test]
    fn role_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::VicePresident).unwrap();
        assert_eq!(json, "\"vice_president\"");
        let back: Role = serde_json::from_str("\"officer\"").unwrap();
        assert_eq!(back, Role::Officer);
    }

    #[test]
    fn only_member_is_not_leadership() {
        assert!(!Role::Member.is_leadership());
        assert!(Role::Officer.is_leadership());
        assert!(Role::President.is_leadership());
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(idx in 0usize..4) {
            let role = Role::ALL[idx];
            prop_assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}
