//! Club Leadership Manager
//!
//! Entry point for every membership and leadership change. Each operation:
//! 1. Opens a store transaction
//! 2. Reads current club and membership state inside it
//! 3. Asks the role policy
//! 4. Applies conditional writes (compare-and-set on the president)
//! 5. Commits and records an audit event under one ordering lock, so the
//!    audit chain follows commit order
//!
//! Returning early drops the transaction, which discards its writes.

use crate::audit::{AuditAction, AuditLog};
use crate::config::{ConfigError, ManagerConfig};
use crate::error::{
    ClaimError, CreateClubError, JoinError, LeaveError, QueryError, SetRoleError, TransferError,
};
use crate::invariants::check_club;
use chrono::Utc;
use sc_model::{Club, ClubId, Membership, NewClub, Role, UserId};
use sc_policy::{check_claim, check_set_role, check_transfer, Denial};
use sc_store::{ClubStore, InMemoryStore, StoreError, StoreTransaction};
use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Club membership and leadership manager
pub struct ClubManager {
    /// Persistence collaborator
    store: Arc<dyn ClubStore>,
    /// Configuration
    config: ManagerConfig,
    /// Committed transitions
    audit: AuditLog,
    /// Held from commit until the audit append completes
    commit_order: Mutex<()>,
}

impl std::fmt::Debug for ClubManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClubManager")
            .field("config", &self.config)
            .field("audit_events", &self.audit.len())
            .finish_non_exhaustive()
    }
}

impl ClubManager {
    /// Create manager over `store`
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if `config` fails
    /// [`ManagerConfig::validate`]
    pub fn new(store: Arc<dyn ClubStore>, config: ManagerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_validated(store, config))
    }

    /// Manager over a fresh in-memory store with default configuration
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_validated(Arc::new(InMemoryStore::new()), ManagerConfig::default())
    }

    fn with_validated(store: Arc<dyn ClubStore>, config: ManagerConfig) -> Self {
        Self {
            store,
            config,
            audit: AuditLog::new(),
            commit_order: Mutex::new(()),
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Audit log of committed transitions
    #[inline]
    #[must_use]
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Commit `tx` and append the audit event before any other commit can
    async fn commit_and_record(
        &self,
        tx: Box<dyn StoreTransaction>,
        club_id: ClubId,
        actor: Option<UserId>,
        action: AuditAction,
    ) -> Result<(), StoreError> {
        let _order = self.commit_order.lock().await;
        tx.commit().await?;
        if self.config.audit_enabled {
            let event = self.audit.append(club_id, actor, action);
            tracing::debug!(seq = event.seq, action = event.action.label(), "audit event recorded");
        }
        Ok(())
    }

    /// Create an unclaimed club
    ///
    /// The name is trimmed and tags are normalized before validation.
    ///
    /// # Errors
    /// - `EmptyName`, `NameTooLong`, `TooManyTags` for invalid input
    pub async fn create_club(&self, new: NewClub) -> Result<Club, CreateClubError> {
        let new = new.normalized();
        if new.name.is_empty() {
            return Err(CreateClubError::EmptyName);
        }
        let len = new.name.chars().count();
        if len > self.config.max_name_len {
            return Err(CreateClubError::NameTooLong {
                len,
                max: self.config.max_name_len,
            });
        }
        if new.profile.tags.len() > self.config.max_tags {
            return Err(CreateClubError::TooManyTags {
                count: new.profile.tags.len(),
                max: self.config.max_tags,
            });
        }

        let club = Club::unclaimed(ClubId::new(), new, Utc::now());
        let mut tx = self.store.begin().await?;
        tx.insert_club(&club).await?;
        self.commit_and_record(
            tx,
            club.id,
            None,
            AuditAction::ClubCreated {
                name: club.name.clone(),
            },
        )
        .await?;
        tracing::info!(club_id = %club.id, name = %club.name, "club created");
        Ok(club)
    }

    /// Claim an unclaimed club, making `user` its first president
    ///
    /// `confirmed` must be true: the caller asserts explicit intent.
    /// An existing membership of `user` is upgraded rather than duplicated.
    ///
    /// # Errors
    /// - `NotConfirmed` if `confirmed` is false
    /// - `NotFound` if the club does not exist
    /// - `AlreadyClaimed` if the club has a president, including when a
    ///   concurrent claim won the conditional write
    pub async fn claim(
        &self,
        club_id: ClubId,
        user: UserId,
        confirmed: bool,
    ) -> Result<Club, ClaimError> {
        if !confirmed {
            tracing::warn!(club_id = %club_id, user_id = %user, "claim rejected: not confirmed");
            return Err(ClaimError::NotConfirmed);
        }

        let mut tx = self.store.begin().await?;
        let mut club = tx
            .club(club_id)
            .await?
            .ok_or(ClaimError::NotFound(club_id))?;

        if check_claim(&club).is_err() || !tx.set_president_if(club_id, None, user).await? {
            tracing::warn!(club_id = %club_id, user_id = %user, "claim rejected: already claimed");
            return Err(ClaimError::AlreadyClaimed(club_id));
        }

        tx.upsert_membership(&Membership::new(club_id, user, Role::President, Utc::now()))
            .await?;
        self.commit_and_record(tx, club_id, Some(user), AuditAction::Claimed)
            .await?;

        club.claimed = true;
        club.president = Some(user);
        tracing::info!(club_id = %club_id, user_id = %user, "club claimed");
        Ok(club)
    }

    /// Hand the presidency from `acting` to `target`
    ///
    /// The outgoing president keeps their membership with the configured
    /// outgoing role (officer by default).
    ///
    /// # Errors
    /// - `NotFound` if the club does not exist
    /// - `NotPresident` if `acting` is not the current president
    /// - `SelfTransfer` if `acting == target`
    /// - `TargetNotMember` if `target` has not joined the club
    pub async fn transfer(
        &self,
        club_id: ClubId,
        acting: UserId,
        target: UserId,
    ) -> Result<Club, TransferError> {
        let mut tx = self.store.begin().await?;
        let mut club = tx
            .club(club_id)
            .await?
            .ok_or(TransferError::NotFound(club_id))?;
        let acting_role = tx.membership(club_id, acting).await?.map(|m| m.role);

        if let Err(denial) = check_transfer(&club, acting, acting_role, target) {
            tracing::warn!(club_id = %club_id, user_id = %acting, %denial, "transfer denied");
            return Err(match denial {
                Denial::SelfTarget => TransferError::SelfTransfer,
                _ => TransferError::NotPresident,
            });
        }

        if tx.membership(club_id, target).await?.is_none() {
            tracing::warn!(club_id = %club_id, target = %target, "transfer denied: target not a member");
            return Err(TransferError::TargetNotMember(target));
        }

        let outgoing = self.config.outgoing_president_role;
        if outgoing == Role::President {
            tracing::error!(club_id = %club_id, "transfer refused: outgoing role would keep a second president");
            return Err(TransferError::InvalidOutgoingRole(outgoing));
        }

        // Demote first so at no point two rows hold the president role
        if !tx.update_role(club_id, acting, outgoing).await? {
            return Err(TransferError::NotPresident);
        }
        if !tx.update_role(club_id, target, Role::President).await? {
            return Err(TransferError::TargetNotMember(target));
        }
        if !tx.set_president_if(club_id, Some(acting), target).await? {
            tracing::warn!(club_id = %club_id, user_id = %acting, "transfer lost president compare-and-set");
            return Err(TransferError::NotPresident);
        }
        self.commit_and_record(
            tx,
            club_id,
            Some(acting),
            AuditAction::Transferred {
                from: acting,
                to: target,
            },
        )
        .await?;

        club.president = Some(target);
        tracing::info!(club_id = %club_id, from = %acting, to = %target, "leadership transferred");
        Ok(club)
    }

    /// Change a member's role among member, officer and vice president
    ///
    /// Presidency is never assigned here; use [`ClubManager::transfer`].
    ///
    /// # Errors
    /// - `NotFound` if the club does not exist
    /// - `NotPresident` if `acting` is not the current president
    /// - `InvalidRole` if `role` is president
    /// - `SelfDemotion` if the president targets themselves
    /// - `TargetNotMember` if `target` has not joined the club
    pub async fn set_role(
        &self,
        club_id: ClubId,
        acting: UserId,
        target: UserId,
        role: Role,
    ) -> Result<Membership, SetRoleError> {
        let mut tx = self.store.begin().await?;
        let club = tx
            .club(club_id)
            .await?
            .ok_or(SetRoleError::NotFound(club_id))?;
        let acting_role = tx.membership(club_id, acting).await?.map(|m| m.role);

        if let Err(denial) = check_set_role(&club, acting, acting_role, target, role) {
            tracing::warn!(club_id = %club_id, user_id = %acting, %denial, %role, "role change denied");
            return Err(match denial {
                Denial::InvalidRole => SetRoleError::InvalidRole(role),
                Denial::SelfTarget => SetRoleError::SelfDemotion,
                _ => SetRoleError::NotPresident,
            });
        }

        let Some(mut membership) = tx.membership(club_id, target).await? else {
            return Err(SetRoleError::TargetNotMember(target));
        };
        let previous = membership.role;
        if previous == role {
            return Ok(membership);
        }

        if !tx.update_role(club_id, target, role).await? {
            return Err(SetRoleError::TargetNotMember(target));
        }
        self.commit_and_record(
            tx,
            club_id,
            Some(acting),
            AuditAction::RoleChanged {
                target,
                from: previous,
                to: role,
            },
        )
        .await?;
        membership.role = role;
        tracing::info!(club_id = %club_id, target = %target, from = %previous, to = %role, "role changed");
        Ok(membership)
    }

    /// Join a club as a plain member
    ///
    /// # Errors
    /// - `ClubNotFound` if the club does not exist
    /// - `AlreadyMember` if `user` already has a membership
    pub async fn join(&self, club_id: ClubId, user: UserId) -> Result<Membership, JoinError> {
        let mut tx = self.store.begin().await?;
        if tx.club(club_id).await?.is_none() {
            return Err(JoinError::ClubNotFound(club_id));
        }

        let membership = Membership::new(club_id, user, Role::Member, Utc::now());
        if !tx.insert_membership(&membership).await? {
            return Err(JoinError::AlreadyMember(club_id));
        }
        self.commit_and_record(tx, club_id, Some(user), AuditAction::Joined)
            .await?;
        tracing::info!(club_id = %club_id, user_id = %user, "member joined");
        Ok(membership)
    }

    /// Leave a club
    ///
    /// # Errors
    /// - `NotMember` if `user` has no membership
    /// - `IsPresident` if `user` is the current president
    pub async fn leave(&self, club_id: ClubId, user: UserId) -> Result<(), LeaveError> {
        let mut tx = self.store.begin().await?;
        let Some(membership) = tx.membership(club_id, user).await? else {
            return Err(LeaveError::NotMember(club_id));
        };
        let is_recorded_president = tx
            .club(club_id)
            .await?
            .is_some_and(|club| club.is_president(user));

        if is_recorded_president || membership.is_president() {
            tracing::warn!(club_id = %club_id, user_id = %user, "leave denied: president must transfer first");
            return Err(LeaveError::IsPresident);
        }

        if !tx.delete_membership(club_id, user).await? {
            return Err(LeaveError::NotMember(club_id));
        }
        self.commit_and_record(tx, club_id, Some(user), AuditAction::Left)
            .await?;
        tracing::info!(club_id = %club_id, user_id = %user, "member left");
        Ok(())
    }

    /// Read a club
    ///
    /// # Errors
    /// - `NotFound` if the club does not exist
    pub async fn club(&self, club_id: ClubId) -> Result<Club, QueryError> {
        self.store
            .club(club_id)
            .await?
            .ok_or(QueryError::NotFound(club_id))
    }

    /// Club members, leadership first, then by join time
    ///
    /// # Errors
    /// - `NotFound` if the club does not exist
    pub async fn members(&self, club_id: ClubId) -> Result<Vec<Membership>, QueryError> {
        let mut tx = self.store.begin().await?;
        if tx.club(club_id).await?.is_none() {
            return Err(QueryError::NotFound(club_id));
        }
        let mut members = tx.members(club_id).await?;
        sort_members(&mut members);
        Ok(members)
    }

    /// One membership, if any
    ///
    /// # Errors
    /// Propagates storage failures
    pub async fn membership(
        &self,
        club_id: ClubId,
        user: UserId,
    ) -> Result<Option<Membership>, StoreError> {
        let mut tx = self.store.begin().await?;
        tx.membership(club_id, user).await
    }

    /// Every club `user` belongs to, highest role first
    ///
    /// # Errors
    /// Propagates storage failures
    pub async fn clubs_for(&self, user: UserId) -> Result<Vec<Membership>, StoreError> {
        let mut memberships = self.store.memberships_of(user).await?;
        sort_members(&mut memberships);
        Ok(memberships)
    }

    /// Check the leadership invariant over a consistent snapshot
    ///
    /// # Errors
    /// - `NotFound` if the club does not exist
    /// - `Violation` if the stored state is inconsistent
    pub async fn verify_club(&self, club_id: ClubId) -> Result<(), QueryError> {
        let mut tx = self.store.begin().await?;
        let club = tx
            .club(club_id)
            .await?
            .ok_or(QueryError::NotFound(club_id))?;
        let members = tx.members(club_id).await?;
        check_club(&club, &members).map_err(|violation| {
            tracing::error!(club_id = %club_id, %violation, "leadership invariant violated");
            QueryError::from(violation)
        })
    }
}

fn sort_members(members: &mut [Membership]) {
    members.sort_by_key(|m| (Reverse(m.role), m.joined_at));
}
