use crate::denial::Denial;
use sc_model::{Club, Role, UserId};

/// Roles the generic promotion/demotion path may assign
pub const ASSIGNABLE_ROLES: [Role; 3] = [Role::Member, Role::Officer, Role::VicePresident];

/// A club can be claimed only while it has no president.
#[inline]
#[must_use]
pub fn can_claim(club: &Club) -> bool {
    !club.claimed
}

/// Only the president promotes.
#[inline]
#[must_use]
pub fn can_promote(acting_role: Role) -> bool {
    acting_role == Role::President
}

/// Only the president demotes, and never themselves (they must transfer).
#[inline]
#[must_use]
pub fn can_demote(acting_user: UserId, target_user: UserId, acting_role: Role) -> bool {
    acting_role == Role::President && acting_user != target_user
}

/// Only the president hands over the presidency.
#[inline]
#[must_use]
pub fn can_transfer(acting_role: Role) -> bool {
    acting_role == Role::President
}

/// Whether `role` may be set through the generic role path.
#[inline]
#[must_use]
pub fn valid_target_role(role: Role) -> bool {
    ASSIGNABLE_ROLES.contains(&role)
}

/// Claim check
///
/// # Errors
/// - [`Denial::AlreadyClaimed`] if the club has a president
pub fn check_claim(club: &Club) -> Result<(), Denial> {
    if can_claim(club) {
        Ok(())
    } else {
        Err(Denial::AlreadyClaimed)
    }
}

/// Transfer check
///
/// `acting_role` is the acting user's membership role, `None` if not a member.
/// Authority requires both the club's president reference and the membership
/// role to name the acting user.
///
/// # Errors
/// - [`Denial::NotClaimed`] if the club has no president
/// - [`Denial::NotAuthorized`] if the acting user is not the president
/// - [`Denial::SelfTarget`] if acting and target user are the same
pub fn check_transfer(
    club: &Club,
    acting: UserId,
    acting_role: Option<Role>,
    target: UserId,
) -> Result<(), Denial> {
    if !club.claimed {
        return Err(Denial::NotClaimed);
    }
    if !club.is_president(acting) || !acting_role.is_some_and(can_transfer) {
        return Err(Denial::NotAuthorized);
    }
    if acting == target {
        return Err(Denial::SelfTarget);
    }
    Ok(())
}

/// Promotion/demotion check
///
/// Checks run in order: authority, then role validity, then self-target.
/// Any role change the president applies to themselves is a demotion.
///
/// # Errors
/// - [`Denial::NotAuthorized`] if the acting user is not the president
/// - [`Denial::InvalidRole`] if `role` is not assignable
/// - [`Denial::SelfTarget`] if the president targets themselves
pub fn check_set_role(
    club: &Club,
    acting: UserId,
    acting_role: Option<Role>,
    target: UserId,
    role: Role,
) -> Result<(), Denial> {
    let Some(acting_role) = acting_role.filter(|_| club.is_president(acting)) else {
        return Err(Denial::NotAuthorized);
    };
    if !can_promote(acting_role) {
        return Err(Denial::NotAuthorized);
    }
    if !valid_target_role(role) {
        return Err(Denial::InvalidRole);
    }
    if !can_demote(acting, target, acting_role) {
        return Err(Denial::SelfTarget);
    }
    Ok(())
}
