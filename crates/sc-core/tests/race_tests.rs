//! Concurrent claim and transfer races
//!
//! Run with: cargo test --package sc-core --test race_tests

use futures::future::join_all;
use sc_core::prelude::*;
use sc_core::{AuditAction, ClaimError, TransferError};
use sc_test_utils::{assert_single_president, club_with_members, unclaimed_club, users};
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_single_winner() {
    let manager = Arc::new(ClubManager::in_memory());
    let club = unclaimed_club(&manager, "Robotics").await;
    let club_id = club.id;
    let contenders = users(32);

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
    assert_single_president(&manager, club.id, winners[0]).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_races_across_many_clubs() {
    let manager = Arc::new(ClubManager::in_memory());
    let mut clubs = Vec::new();
    for i in 0..8 {
        clubs.push(unclaimed_club(&manager, &format!("Club {i}")).await);
    }

    let mut handles = Vec::new();
    for club in &clubs {
        for contender in users(6) {
            let manager = Arc::clone(&manager);
            let club_id = club.id;
            handles.push(tokio::spawn(async move {
                manager.claim(club_id, contender, true).await.is_ok()
            }));
        }
    }
    let wins = join_all(handles)
        .await
        .into_iter()
        .filter(|r| *r.as_ref().unwrap())
        .count();

    assert_eq!(wins, clubs.len());
    for club in &clubs {
        assert!(manager.verify_club(club.id).await.is_ok());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_keep_one_president() {
    let manager = Arc::new(ClubManager::in_memory());
    let people = users(5);
    let president = people[0];
    let club = club_with_members(&manager, president, &people[1..]).await;
    let club_id = club.id;

    let handles: Vec<_> = people[1..]
        .iter()
        .map(|&target| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.transfer(club_id, president, target).await })
        })
        .collect();

    let mut new_president = None;
    for result in join_all(handles).await {
        match result.unwrap() {
            Ok(updated) => {
                assert!(new_president.is_none(), "only one transfer may win");
                new_president = updated.president;
            }
            Err(err) => assert!(matches!(err, TransferError::NotPresident)),
        }
    }

    let new_president = new_president.unwrap();
    assert_single_president(&manager, club.id, new_president).await;
    let officers = manager
        .members(club.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|m| m.role == Role::Officer)
        .count();
    assert_eq!(officers, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_audit_order_follows_commit_order() {
    let manager = Arc::new(ClubManager::in_memory());
    let people = users(4);
    let founder = people[0];
    let club = club_with_members(&manager, founder, &people[1..]).await;
    let club_id = club.id;

    // each task hands the presidency on from whoever holds it when it looks
    let handles: Vec<_> = (0..8)
        .map(|task| {
            let manager = Arc::clone(&manager);
            let people = people.clone();
            tokio::spawn(async move {
                for round in 0..10 {
                    let Some(current) = manager.club(club_id).await.unwrap().president else {
                        continue;
                    };
                    let target = people[(task + round) % people.len()];
                    if target == current {
                        continue;
                    }
                    match manager.transfer(club_id, current, target).await {
                        Ok(_) | Err(TransferError::NotPresident) => {}
                        Err(other) => panic!("unexpected transfer error: {other}"),
                    }
                }
            })
        })
        .collect();
    for result in join_all(handles).await {
        result.unwrap();
    }

    let hops: Vec<(UserId, UserId)> = manager
        .audit()
        .events_for(club_id)
        .into_iter()
        .filter_map(|e| match e.action {
            AuditAction::Transferred { from, to } => Some((from, to)),
            _ => None,
        })
        .collect();
    assert!(!hops.is_empty());
    assert_eq!(hops[0].0, founder);
    for pair in hops.windows(2) {
        assert_eq!(pair[1].0, pair[0].1, "transfer logged out of commit order");
    }

    let current = manager.club(club_id).await.unwrap().president.unwrap();
    assert_eq!(hops[hops.len() - 1].1, current);
    assert!(manager.audit().verify_integrity().is_ok());
    assert_single_president(&manager, club_id, current).await;
}
