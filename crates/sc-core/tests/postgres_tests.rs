//! Leadership races over the PostgreSQL store
//!
//! Set `DATABASE_URL` to run; without it every test returns early.
//! Run with: cargo test --package sc-core --features postgres --test postgres_tests

#![cfg(feature = "postgres")]

use futures::future::join_all;
use sc_core::prelude::*;
use sc_core::ClaimError;
use sc_store::PgStore;
use sc_test_utils::{assert_single_president, unclaimed_club, users};
use std::sync::Arc;

async fn pg_manager() -> Option<Arc<ClubManager>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL test");
        return None;
    };
    let store = PgStore::connect(&url, 16).await.unwrap();
    store.ensure_schema().await.unwrap();
    let manager = ClubManager::new(Arc::new(store), ManagerConfig::default()).unwrap();
    Some(Arc::new(manager))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_single_winner() {
    let Some(manager) = pg_manager().await else {
        return;
    };
    let club = unclaimed_club(&manager, "Robotics").await;
    let club_id = club.id;
    let contenders = users(24);

    let handles: Vec<_> = contenders
        .iter()
        .map(|&contender| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { (contender, manager.claim(club_id, contender, true).await) })
        })
        .collect();

    let mut winners = Vec::new();
    let mut already_claimed = 0;
    for result in join_all(handles).await {
        match result.unwrap() {
            (contender, Ok(_)) => winners.push(contender),
            (_, Err(ClaimError::AlreadyClaimed(_))) => already_claimed += 1,
            (_, Err(other)) => panic!("unexpected claim error: {other}"),
        }
    }

    assert_eq!(winners.len(), 1, "exactly one claim wins");
    assert_eq!(already_claimed, contenders.len() - 1);
    assert_single_president(&manager, club_id, winners[0]).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_transfer_keeps_one_president_row() {
    let Some(manager) = pg_manager().await else {
        return;
    };
    let club = unclaimed_club(&manager, "Chess").await;
    let [alice, bob] = [UserId::new(), UserId::new()];
    manager.claim(club.id, alice, true).await.unwrap();
    manager.join(club.id, bob).await.unwrap();

    manager.transfer(club.id, alice, bob).await.unwrap();

    assert_single_president(&manager, club.id, bob).await;
    let alice_row = manager.membership(club.id, alice).await.unwrap().unwrap();
    assert_eq!(alice_row.role, Role::Officer);
}
