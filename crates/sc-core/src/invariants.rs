//! Leadership invariant checks
//!
//! For every club: `claimed` iff a president is recorded, at most one
//! membership carries the president role, and that membership belongs to the
//! recorded president.

use sc_model::{Club, ClubId, Membership, UserId};
use serde::Serialize;
use std::collections::HashSet;

/// A broken cross-entity invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum InvariantViolation {
    #[error("club {club} is claimed but has no president")]
    ClaimedWithoutPresident { club: ClubId },

    #[error("club {club} has a president but is not claimed")]
    PresidentWithoutClaim { club: ClubId },

    #[error("club {club} has {count} president memberships")]
    MultiplePresidents { club: ClubId, count: usize },

    #[error("club {club} records president {recorded} but membership names {member}")]
    PresidentMismatch {
        club: ClubId,
        recorded: UserId,
        member: UserId,
    },

    #[error("president {president} of club {club} has no president membership")]
    PresidentNotMember { club: ClubId, president: UserId },

    #[error("membership for club {found} listed under club {club}")]
    ForeignMembership { club: ClubId, found: ClubId },

    #[error("user {user} has more than one membership in club {club}")]
    DuplicateMembership { club: ClubId, user: UserId },
}

/// Check one club against its membership rows
///
/// # Errors
/// Returns the first violation found
pub fn check_club(club: &Club, members: &[Membership]) -> Result<(), InvariantViolation> {
    let mut seen = HashSet::with_capacity(members.len());
    for m in members {
        if m.club_id != club.id {
            return Err(InvariantViolation::ForeignMembership {
                club: club.id,
                found: m.club_id,
            });
        }
        if !seen.insert(m.user_id) {
            return Err(InvariantViolation::DuplicateMembership {
                club: club.id,
                user: m.user_id,
            });
        }
    }

    if !club.is_consistent() {
        return Err(if club.claimed {
            InvariantViolation::ClaimedWithoutPresident { club: club.id }
        } else {
            InvariantViolation::PresidentWithoutClaim { club: club.id }
        });
    }

    let presidents: Vec<&Membership> = members.iter().filter(|m| m.is_president()).collect();
    if presidents.len() > 1 {
        return Err(InvariantViolation::MultiplePresidents {
            club: club.id,
            count: presidents.len(),
        });
    }

    match (club.president, presidents.first()) {
        (None, None) => Ok(()),
        (None, Some(_)) => Err(InvariantViolation::PresidentWithoutClaim { club: club.id }),
        (Some(president), None) => Err(InvariantViolation::PresidentNotMember {
            club: club.id,
            president,
        }),
        (Some(recorded), Some(member)) if member.user_id != recorded => {
            Err(InvariantViolation::PresidentMismatch {
                club: club.id,
                recorded,
                member: member.user_id,
            })
        }
        (Some(_), Some(_)) => Ok(()),
    }
}
