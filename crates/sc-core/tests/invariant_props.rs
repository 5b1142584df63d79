use proptest::prelude::*;
use sc_core::prelude::*;
use sc_core::ClubError;
use sc_test_utils::{unclaimed_club, users};

const USERS: usize = 4;

#[derive(Debug, Clone)]
enum Op {
    Claim(usize),
    Join(usize),
    Leave(usize),
    Transfer(usize, usize),
    SetRole(usize, usize, Role),
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Member),
        Just(Role::Officer),
        Just(Role::VicePresident),
        Just(Role::President),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    let u = 0..USERS;
    prop_oneof![
        u.clone().prop_map(Op::Claim),
        u.clone().prop_map(Op::Join),
        u.clone().prop_map(Op::Leave),
        (u.clone(), u.clone()).prop_map(|(a, b)| Op::Transfer(a, b)),
        (u.clone(), u, role()).prop_map(|(a, b, r)| Op::SetRole(a, b, r)),
    ]
}

async fn apply(manager: &ClubManager, club: ClubId, people: &[UserId], op: &Op) -> Result<(), ClubError> {
    match *op {
        Op::Claim(u) => manager.claim(club, people[u], true).await.map(drop)?,
        Op::Join(u) => manager.join(club, people[u]).await.map(drop)?,
        Op::Leave(u) => manager.leave(club, people[u]).await?,
        Op::Transfer(a, b) => manager.transfer(club, people[a], people[b]).await.map(drop)?,
        Op::SetRole(a, b, r) => manager.set_role(club, people[a], people[b], r).await.map(drop)?,
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_single_president_after_every_operation(ops in prop::collection::vec(op(), 1..40)) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let manager = ClubManager::in_memory();
            let club = unclaimed_club(&manager, "Prop Club").await.id;
            let people = users(USERS);

            for op in &ops {
                if let Err(err) = apply(&manager, club, &people, op).await {
                    assert_ne!(err.kind(), ErrorKind::Internal, "{op:?} failed: {err}");
                }
                manager.verify_club(club).await.unwrap();

                let record = manager.club(club).await.unwrap();
                let presidents = manager
                    .members(club)
                    .await
                    .unwrap()
                    .into_iter()
                    .filter(|m| m.role == Role::President)
                    .count();
                assert_eq!(presidents, usize::from(record.claimed));
            }
        });
    }

    #[test]
    fn prop_claimed_never_reverts(ops in prop::collection::vec(op(), 1..30)) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let manager = ClubManager::in_memory();
            let club = unclaimed_club(&manager, "Prop Club").await.id;
            let people = users(USERS);

            let mut was_claimed = false;
            for op in &ops {
                let _ = apply(&manager, club, &people, op).await;
                let claimed = manager.club(club).await.unwrap().claimed;
                assert!(claimed || !was_claimed);
                was_claimed = claimed;
            }
        });
    }
}
