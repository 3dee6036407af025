//! Integration tests for points, badges, rewards, mastery, governance and events.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use fait_core::error::CoreError;
use fait_core::governance::VoteChoice;
use fait_db::models::points::PointsAward;
use fait_db::models::profile::UpsertProfile;
use fait_db::models::reward::UpdateReward;
use fait_db::repositories::{
    BadgeRepo, CastVoteResult, EventRepo, GovernanceRepo, MasteryRepo, PointsRepo, ProfileRepo,
    RedeemResult, RewardRepo, SpendResult,
};

fn new_profile(id: i64) -> UpsertProfile {
    UpsertProfile {
        full_name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        phone: None,
        address: None,
        city: None,
        state: None,
        zip_code: None,
        avatar_url: None,
    }
}

async fn seed_profile(pool: &PgPool, id: i64, role: &str) {
    ProfileRepo::create(pool, id, role, &new_profile(id))
        .await
        .unwrap();
}

async fn open_proposal(pool: &PgPool, created_by: i64, ends_in: Duration) -> i64 {
    GovernanceRepo::create(
        pool,
        created_by,
        "Lower platform fee",
        "Reduce the fee for verified contractors",
        "policy",
        Utc::now() + ends_in,
        100,
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_balance_is_earned_minus_spent(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    assert_eq!(PointsRepo::balance(&pool, 1).await.unwrap(), 0);

    PointsRepo::award(&pool, 1, 100, "Welcome bonus", None).await.unwrap();
    PointsRepo::award(&pool, 1, 50, "Booking completed", None).await.unwrap();

    let spent = PointsRepo::spend(&pool, 1, 30, "Profile boost").await.unwrap();
    assert_matches!(spent, SpendResult::Spent(ref t) if t.transaction_type == "spent");

    let totals = PointsRepo::totals(&pool, 1).await.unwrap();
    assert_eq!(totals.earned, 150);
    assert_eq!(totals.spent, 30);
    assert_eq!(totals.balance(), 120);

    let ledger = PointsRepo::list_for_user(&pool, 1, 10, 0).await.unwrap();
    assert_eq!(ledger.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_spend_beyond_balance_is_rejected(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    PointsRepo::award(&pool, 1, 20, "Daily login", None).await.unwrap();

    let result = PointsRepo::spend(&pool, 1, 21, "Too much").await.unwrap();
    assert_matches!(result, SpendResult::Insufficient { balance: 20 });
    assert_eq!(PointsRepo::balance(&pool, 1).await.unwrap(), 20);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_spends_cannot_overdraw(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    PointsRepo::award(&pool, 1, 100, "Welcome bonus", None).await.unwrap();

    let (a, b, c) = tokio::join!(
        PointsRepo::spend(&pool, 1, 60, "Profile boost"),
        PointsRepo::spend(&pool, 1, 60, "Profile boost"),
        PointsRepo::spend(&pool, 1, 60, "Profile boost")
    );
    let spent = [a.unwrap(), b.unwrap(), c.unwrap()]
        .iter()
        .filter(|r| matches!(r, SpendResult::Spent(_)))
        .count();
    assert_eq!(spent, 1);
    assert_eq!(PointsRepo::balance(&pool, 1).await.unwrap(), 40);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_positive_amount_violates_check(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    let err = PointsRepo::award(&pool, 1, 0, "Nothing", None).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23514"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_welcome_award_commits_with_profile(pool: PgPool) {
    let welcome = PointsAward {
        points_amount: 100,
        description: "Welcome bonus",
    };
    let profile = ProfileRepo::create_with_award(&pool, 5, "client", &new_profile(5), &welcome)
        .await
        .unwrap();
    assert_eq!(PointsRepo::balance(&pool, profile.id).await.unwrap(), 100);

    // A rejected award leaves no profile behind.
    let broken = PointsAward {
        points_amount: 0,
        description: "Welcome bonus",
    };
    let err = ProfileRepo::create_with_award(&pool, 6, "client", &new_profile(6), &broken)
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23514"));
    assert!(ProfileRepo::find_by_id(&pool, 6).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_leaderboard_orders_by_balance(pool: PgPool) {
    for id in 1..=3 {
        seed_profile(&pool, id, "client").await;
    }
    PointsRepo::award(&pool, 2, 300, "Bonus", None).await.unwrap();
    PointsRepo::award(&pool, 3, 100, "Bonus", None).await.unwrap();

    let board = PointsRepo::leaderboard(&pool, 2).await.unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].user_id, 2);
    assert_eq!(board[0].balance, 300);
    assert_eq!(board[1].user_id, 3);
}

// ---------------------------------------------------------------------------
// Mastery
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mastery_upsert_overwrites(pool: PgPool) {
    seed_profile(&pool, 2, "contractor").await;
    assert!(MasteryRepo::find_by_profile(&pool, 2).await.unwrap().is_none());

    let first = MasteryRepo::upsert(&pool, 2, 100, 100, 50, 250).await.unwrap();
    let second = MasteryRepo::upsert(&pool, 2, 500, 400, 300, 1200).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.overall_score, 1200);

    let top = MasteryRepo::top(&pool, 5).await.unwrap();
    assert_eq!(top.len(), 1);
}

// ---------------------------------------------------------------------------
// Governance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_vote_switch_and_repeat(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    seed_profile(&pool, 2, "client").await;
    let id = open_proposal(&pool, 1, Duration::days(7)).await;

    let outcome = match GovernanceRepo::cast_vote(&pool, id, 1, VoteChoice::For).await.unwrap() {
        CastVoteResult::Recorded(o) => o,
        other => panic!("expected a recorded vote, got {other:?}"),
    };
    assert_eq!((outcome.proposal.votes_for, outcome.proposal.votes_against), (1, 0));

    GovernanceRepo::cast_vote(&pool, id, 2, VoteChoice::For).await.unwrap();

    // Switching moves one unit.
    let switched = match GovernanceRepo::cast_vote(&pool, id, 1, VoteChoice::Against)
        .await
        .unwrap()
    {
        CastVoteResult::Recorded(o) => o,
        other => panic!("expected a recorded vote, got {other:?}"),
    };
    assert_eq!((switched.proposal.votes_for, switched.proposal.votes_against), (1, 1));
    assert_eq!(switched.vote.vote, "against");

    // Repeating is a no-op.
    let repeated = match GovernanceRepo::cast_vote(&pool, id, 1, VoteChoice::Against)
        .await
        .unwrap()
    {
        CastVoteResult::Recorded(o) => o,
        other => panic!("expected a recorded vote, got {other:?}"),
    };
    assert_eq!((repeated.proposal.votes_for, repeated.proposal.votes_against), (1, 1));

    let vote = GovernanceRepo::find_vote(&pool, id, 1).await.unwrap().unwrap();
    assert_eq!(vote.vote, "against");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_vote_rejected_after_end_and_unknown_proposal(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    let id = open_proposal(&pool, 1, Duration::seconds(-1)).await;

    let result = GovernanceRepo::cast_vote(&pool, id, 1, VoteChoice::For).await.unwrap();
    assert_matches!(result, CastVoteResult::Rejected(CoreError::Conflict(_)));

    let missing = GovernanceRepo::cast_vote(&pool, 9_999, 1, VoteChoice::For).await.unwrap();
    assert_matches!(missing, CastVoteResult::NotFound);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_close_decides_outcome(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    seed_profile(&pool, 2, "client").await;
    let tie = open_proposal(&pool, 1, Duration::days(1)).await;
    let win = open_proposal(&pool, 1, Duration::days(1)).await;

    GovernanceRepo::cast_vote(&pool, tie, 1, VoteChoice::For).await.unwrap();
    GovernanceRepo::cast_vote(&pool, tie, 2, VoteChoice::Against).await.unwrap();
    GovernanceRepo::cast_vote(&pool, win, 1, VoteChoice::For).await.unwrap();

    let closed_tie = GovernanceRepo::close(&pool, tie).await.unwrap().unwrap();
    assert_eq!(closed_tie.status, "failed");
    let closed_win = GovernanceRepo::close(&pool, win).await.unwrap().unwrap();
    assert_eq!(closed_win.status, "passed");

    // Closing again leaves the decision alone and voting is refused.
    let again = GovernanceRepo::close(&pool, win).await.unwrap().unwrap();
    assert_eq!(again.status, "passed");
    let result = GovernanceRepo::cast_vote(&pool, win, 2, VoteChoice::Against)
        .await
        .unwrap();
    assert_matches!(result, CastVoteResult::Rejected(_));

    let active = GovernanceRepo::list(&pool, Some("active"), None, 10, 0).await.unwrap();
    assert!(active.is_empty());
}

// ---------------------------------------------------------------------------
// Badges and rewards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_badges_award_once_and_ignore_spending(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    assert!(BadgeRepo::award_earned(&pool, 1).await.unwrap().is_empty());

    PointsRepo::award(&pool, 1, 100, "Welcome bonus", None).await.unwrap();
    PointsRepo::spend(&pool, 1, 100, "Profile boost").await.unwrap();

    let (a, b) = tokio::join!(
        BadgeRepo::award_earned(&pool, 1),
        BadgeRepo::award_earned(&pool, 1)
    );
    let mut names: Vec<String> = a.unwrap().into_iter().chain(b.unwrap()).map(|b| b.name).collect();
    names.sort();
    assert_eq!(names, vec!["First Steps"]);

    let held = BadgeRepo::list_for_user(&pool, 1).await.unwrap();
    assert_eq!(held.len(), 1);
    assert!(!held[0].is_featured);
    assert_eq!(BadgeRepo::progress(&pool, 1).await.unwrap().lifetime_points, 100);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_featured_badge_is_exclusive(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    seed_profile(&pool, 2, "client").await;
    PointsRepo::award(&pool, 1, 1000, "Community event", None).await.unwrap();
    let held = BadgeRepo::award_earned(&pool, 1).await.unwrap();
    assert_eq!(held.len(), 2);

    let ids: Vec<i64> = BadgeRepo::list_for_user(&pool, 1)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    for id in &ids {
        let featured = BadgeRepo::set_featured(&pool, 1, *id, true).await.unwrap().unwrap();
        assert!(featured.is_featured);
    }
    let featured: Vec<i64> = BadgeRepo::list_for_user(&pool, 1)
        .await
        .unwrap()
        .into_iter()
        .filter(|b| b.is_featured)
        .map(|b| b.id)
        .collect();
    assert_eq!(featured, vec![ids[ids.len() - 1]]);

    assert!(BadgeRepo::set_featured(&pool, 2, ids[0], true).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_redeem_spends_and_records(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    let rewards = RewardRepo::list(&pool, false).await.unwrap();
    assert_eq!(rewards.len(), 3);
    let cheapest = &rewards[0];
    assert_eq!(cheapest.points_cost, 250);

    assert_matches!(
        RewardRepo::redeem(&pool, 1, cheapest.id).await.unwrap(),
        RedeemResult::Insufficient { points_cost: 250, balance: 0 }
    );
    assert!(PointsRepo::list_for_user(&pool, 1, 10, 0).await.unwrap().is_empty());

    PointsRepo::award(&pool, 1, 300, "Community event", None).await.unwrap();
    let redemption = assert_matches!(
        RewardRepo::redeem(&pool, 1, cheapest.id).await.unwrap(),
        RedeemResult::Redeemed(r) => r
    );
    assert_eq!(redemption.points_spent, 250);
    assert_eq!(PointsRepo::balance(&pool, 1).await.unwrap(), 50);

    let listed = RewardRepo::list_for_user(&pool, 1).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].reward_name, cheapest.name);

    assert_matches!(
        RewardRepo::redeem(&pool, 1, 9_999).await.unwrap(),
        RedeemResult::NotFound
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_reward_is_not_redeemed(pool: PgPool) {
    seed_profile(&pool, 1, "client").await;
    PointsRepo::award(&pool, 1, 1000, "Community event", None).await.unwrap();
    let reward = RewardRepo::list(&pool, false).await.unwrap().remove(0);

    let update = UpdateReward {
        name: None,
        description: None,
        points_cost: None,
        is_active: Some(false),
    };
    let updated = RewardRepo::update(&pool, reward.id, &update).await.unwrap().unwrap();
    assert!(!updated.is_active);
    assert_eq!(RewardRepo::list(&pool, false).await.unwrap().len(), 2);
    assert_eq!(RewardRepo::list(&pool, true).await.unwrap().len(), 3);

    assert_matches!(
        RewardRepo::redeem(&pool, 1, reward.id).await.unwrap(),
        RedeemResult::Inactive
    );
    assert_eq!(PointsRepo::balance(&pool, 1).await.unwrap(), 1000);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_types_are_seeded_and_events_insert(pool: PgPool) {
    let et = EventRepo::get_event_type_by_name(&pool, "booking.created")
        .await
        .unwrap()
        .expect("seeded event type");
    assert_eq!(et.category, "booking");

    let id = EventRepo::insert(
        &pool,
        et.id,
        Some("booking"),
        Some(7),
        Some(1),
        &serde_json::json!({"status": "pending"}),
    )
    .await
    .unwrap();

    let recent = EventRepo::list_recent(&pool, 10, 0).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, id);
    assert_eq!(recent[0].payload["status"], "pending");
}
