//! Testing utilities for SchoolConnect workspace
//!
//! Shared fixtures and assertions for manager-level tests.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use sc_core::{check_club, ClubManager, ManagerConfig};
use sc_model::{Club, ClubId, Membership, NewClub, Role, UserId};
use sc_store::{ClubStore, InMemoryStore};
use std::sync::Arc;

/// Manager over a fresh in-memory store
pub fn manager() -> ClubManager {
    ClubManager::in_memory()
}

/// Manager plus a handle to its store, for inspecting raw rows
pub fn manager_with_store(config: ManagerConfig) -> (ClubManager, InMemoryStore) {
    let store = InMemoryStore::new();
    let manager = ClubManager::new(Arc::new(store.clone()), config).unwrap();
    (manager, store)
}

pub fn user() -> UserId {
    UserId::new()
}

pub fn users(n: usize) -> Vec<UserId> {
    (0..n).map(|_| UserId::new()).collect()
}

/// Create an unclaimed club
pub async fn unclaimed_club(manager: &ClubManager, name: &str) -> Club {
    manager
        .create_club(NewClub::new(name).with_category("test"))
        .await
        .unwrap()
}

/// Create a club claimed by `president`
pub async fn claimed_club(manager: &ClubManager, name: &str, president: UserId) -> Club {
    let club = unclaimed_club(manager, name).await;
    manager.claim(club.id, president, true).await.unwrap()
}

/// Create a claimed club and join `members` as plain members
pub async fn club_with_members(
    manager: &ClubManager,
    president: UserId,
    members: &[UserId],
) -> Club {
    let club = claimed_club(manager, "Fixture Club", president).await;
    for &member in members {
        manager.join(club.id, member).await.unwrap();
    }
    club
}

/// Club and all its memberships read from the store
pub async fn snapshot(store: &dyn ClubStore, club: ClubId) -> (Club, Vec<Membership>) {
    let club_row = store.club(club).await.unwrap().unwrap();
    let members = store.members(club).await.unwrap();
    (club_row, members)
}

/// Role held by `user`, if any
pub async fn role_of(manager: &ClubManager, club: ClubId, user: UserId) -> Option<Role> {
    manager
        .membership(club, user)
        .await
        .unwrap()
        .map(|m| m.role)
}

/// Assert the club has exactly one president, matching the club record
pub async fn assert_single_president(manager: &ClubManager, club: ClubId, expected: UserId) {
    let record = manager.club(club).await.unwrap();
    assert!(record.claimed, "club {club} should be claimed");
    assert_eq!(record.president, Some(expected), "recorded president");

    let members = manager.members(club).await.unwrap();
    let presidents: Vec<_> = members.iter().filter(|m| m.is_president()).collect();
    assert_eq!(presidents.len(), 1, "exactly one president membership");
    assert_eq!(presidents[0].user_id, expected);

    check_club(&record, &members).unwrap();
}
