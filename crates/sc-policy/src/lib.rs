//! SchoolConnect Role Policy
//!
//! Stateless decision functions describing which leadership transitions are
//! legal and who may invoke them. Nothing here performs I/O; callers fetch
//! state from the store, ask the policy, then apply the change.
//!
//! # Core Concepts
//!
//! - Boolean predicates ([`can_claim`], [`can_promote`], [`can_demote`],
//!   [`can_transfer`], [`valid_target_role`])
//! - Denial-returning checks ([`check_claim`], [`check_transfer`],
//!   [`check_set_role`]) yielding a [`Denial`] reason
//!
//! Presidency only changes hands through a transfer, so
//! [`valid_target_role`] rejects [`Role::President`](sc_model::Role::President).
//!
//! # Example
//!
//! ```rust,ignore
//! use sc_policy::{check_set_role, Denial};
//! use sc_model::Role;
//!
//! let res = check_set_role(&club, alice, Some(Role::President), bob, Role::President);
//! assert_eq!(res, Err(Denial::InvalidRole));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod denial;
mod rules;

pub use denial::Denial;
pub use rules::{
    can_claim, can_demote, can_promote, can_transfer, check_claim, check_set_role,
    check_transfer, valid_target_role, ASSIGNABLE_ROLES,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
