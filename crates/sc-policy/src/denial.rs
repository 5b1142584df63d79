//! Policy denial reasons

use serde::{Deserialize, Serialize};

/// Why the policy refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// Club already has a president
    #[error("club has already been claimed")]
    AlreadyClaimed,

    /// Club has no president yet
    #[error("club has not been claimed")]
    NotClaimed,

    /// Acting user lacks the president role
    #[error("acting user is not the club president")]
    NotAuthorized,

    /// Acting user targeted themselves
    #[error("acting user cannot target themselves")]
    SelfTarget,

    /// Role cannot be assigned through this path
    #[error("role cannot be assigned directly")]
    InvalidRole,
}
