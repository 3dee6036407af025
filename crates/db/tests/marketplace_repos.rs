//! Integration tests for the marketplace repositories against a real
//! database: bookings, reviews, claims, verification and availability.

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use fait_core::availability::build_slot;
use fait_db::models::booking::NewBooking;
use fait_db::models::profile::UpsertProfile;
use fait_db::models::review::{NewReview, UpsertExternalReview};
use fait_db::models::service_package::{CreateServicePackage, UpdateServicePackage};
use fait_db::models::verification::SubmitVerification;
use fait_db::models::warranty_claim::CreateWarrantyClaim;
use fait_db::models::points::PointsAward;
use fait_db::repositories::{
    AvailabilityRepo, BookingRepo, ExternalReviewRepo, MessageRepo, PointsRepo, ProfileRepo,
    ReviewRepo, ServicePackageRepo, SlotWrite, VerificationRepo, WarrantyClaimRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BONUS: PointsAward = PointsAward {
    points_amount: 200,
    description: "Verification approved",
};

fn new_profile(name: &str) -> UpsertProfile {
    UpsertProfile {
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: None,
        address: None,
        city: None,
        state: None,
        zip_code: None,
        avatar_url: None,
    }
}

fn new_package(title: &str, price_cents: i64) -> CreateServicePackage {
    CreateServicePackage {
        title: title.to_string(),
        description: None,
        price_cents,
        duration: Some("2 hours".to_string()),
        scope: vec!["Inspect".to_string(), "Repair".to_string()],
        exclusions: vec![],
        is_active: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

/// Client 1, contractor 2, one package, one pending booking.
async fn seed_booking(pool: &PgPool) -> (i64, i64, i64, i64) {
    ProfileRepo::create(pool, 1, "client", &new_profile("Casey Client"))
        .await
        .unwrap();
    ProfileRepo::create(pool, 2, "contractor", &new_profile("Drew Builder"))
        .await
        .unwrap();
    let package = ServicePackageRepo::create(pool, 2, &new_package("Gutter cleaning", 15_000))
        .await
        .unwrap();
    let booking = BookingRepo::create(
        pool,
        &NewBooking {
            client_id: 1,
            contractor_id: 2,
            service_package_id: package.id,
            scheduled_date: date(2026, 6, 1),
            scheduled_time: time(9),
            total_amount_cents: package.price_cents,
            notes: Some("Side gate is open".to_string()),
        },
    )
    .await
    .unwrap();
    (1, 2, package.id, booking.id)
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some("23505") && db.constraint() == Some(constraint)
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Profiles and packages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_create_update_and_role(pool: PgPool) {
    let created = ProfileRepo::create(&pool, 42, "client", &new_profile("Pat Jones"))
        .await
        .unwrap();
    assert_eq!(created.id, 42);
    assert_eq!(created.role, "client");

    let mut update = new_profile("Pat Jones");
    update.city = Some("Boston".to_string());
    let updated = ProfileRepo::update(&pool, 42, &update).await.unwrap().unwrap();
    assert_eq!(updated.city.as_deref(), Some("Boston"));

    // Leaving city out keeps the stored value.
    let kept = ProfileRepo::update(&pool, 42, &new_profile("Pat Jones"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.city.as_deref(), Some("Boston"));

    let promoted = ProfileRepo::update_role(&pool, 42, "ally").await.unwrap().unwrap();
    assert_eq!(promoted.role, "ally");

    let allies = ProfileRepo::list(&pool, Some("ally"), 10, 0).await.unwrap();
    assert_eq!(allies.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_violates_unique(pool: PgPool) {
    ProfileRepo::create(&pool, 1, "client", &new_profile("Same Name"))
        .await
        .unwrap();
    let err = ProfileRepo::create(&pool, 2, "client", &new_profile("Same Name"))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, "uq_profiles_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_package_partial_update_and_active_filter(pool: PgPool) {
    ProfileRepo::create(&pool, 2, "contractor", &new_profile("Drew Builder"))
        .await
        .unwrap();
    let pkg = ServicePackageRepo::create(&pool, 2, &new_package("Deck staining", 40_000))
        .await
        .unwrap();
    assert!(pkg.is_active);
    assert_eq!(pkg.scope, vec!["Inspect", "Repair"]);

    let updated = ServicePackageRepo::update(
        &pool,
        pkg.id,
        &UpdateServicePackage {
            title: None,
            description: None,
            price_cents: Some(45_000),
            duration: None,
            scope: None,
            exclusions: Some(vec!["Railings".to_string()]),
            is_active: Some(false),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "Deck staining");
    assert_eq!(updated.price_cents, 45_000);
    assert_eq!(updated.exclusions, vec!["Railings"]);

    let active = ServicePackageRepo::list(&pool, Some(2), true, 10, 0).await.unwrap();
    assert!(active.is_empty());
    let all = ServicePackageRepo::list(&pool, Some(2), false, 10, 0).await.unwrap();
    assert_eq!(all.len(), 1);
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_booking_transition_guards_on_current_status(pool: PgPool) {
    let (_, _, _, booking_id) = seed_booking(&pool).await;

    let confirmed = BookingRepo::transition_status(&pool, booking_id, "pending", "confirmed", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(confirmed.status, "confirmed");
    assert!(confirmed.cancelled_at.is_none());

    // Stale expected status: no row changes.
    let stale = BookingRepo::transition_status(&pool, booking_id, "pending", "cancelled", None)
        .await
        .unwrap();
    assert!(stale.is_none());

    let cancelled = BookingRepo::transition_status(
        &pool,
        booking_id,
        "confirmed",
        "cancelled",
        Some("Weather"),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Weather"));
    assert!(cancelled.cancelled_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bookings_listed_for_both_parties(pool: PgPool) {
    let (client, contractor, _, _) = seed_booking(&pool).await;
    assert_eq!(BookingRepo::list_for_user(&pool, client, None, 10, 0).await.unwrap().len(), 1);
    assert_eq!(
        BookingRepo::list_for_user(&pool, contractor, Some("pending"), 10, 0)
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(BookingRepo::list_for_user(&pool, contractor, Some("completed"), 10, 0)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_package_with_bookings_cannot_be_deleted(pool: PgPool) {
    let (_, _, package_id, _) = seed_booking(&pool).await;
    let err = ServicePackageRepo::delete(&pool, package_id).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23503"));
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_message_thread_and_read_marks(pool: PgPool) {
    let (client, contractor, _, booking_id) = seed_booking(&pool).await;

    MessageRepo::create(&pool, booking_id, client, contractor, "Hi there")
        .await
        .unwrap();
    MessageRepo::create(&pool, booking_id, client, contractor, "Gate code is 1234")
        .await
        .unwrap();
    MessageRepo::create(&pool, booking_id, contractor, client, "Thanks")
        .await
        .unwrap();

    let thread = MessageRepo::list_for_booking(&pool, booking_id, 50, 0).await.unwrap();
    assert_eq!(thread.len(), 3);
    assert_eq!(thread[0].content, "Hi there");

    assert_eq!(MessageRepo::unread_count(&pool, contractor).await.unwrap(), 2);
    assert_eq!(MessageRepo::mark_read(&pool, booking_id, contractor).await.unwrap(), 2);
    assert_eq!(MessageRepo::unread_count(&pool, contractor).await.unwrap(), 0);
    assert_eq!(MessageRepo::unread_count(&pool, client).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_review_per_booking_and_summary(pool: PgPool) {
    let (client, contractor, package_id, booking_id) = seed_booking(&pool).await;

    let summary = ReviewRepo::rating_summary(&pool, contractor).await.unwrap();
    assert_eq!(summary.review_count, 0);
    assert!(summary.average_rating.is_none());

    let review = NewReview {
        booking_id,
        client_id: client,
        contractor_id: contractor,
        service_package_id: package_id,
        rating: 4,
        comment: Some("Tidy work".to_string()),
    };
    ReviewRepo::create(&pool, &review).await.unwrap();
    let repeat = NewReview {
        rating: 5,
        comment: None,
        ..review
    };
    let err = ReviewRepo::create(&pool, &repeat).await.unwrap_err();
    assert!(is_unique_violation(&err, "uq_reviews_booking_id"));

    let summary = ReviewRepo::rating_summary(&pool, contractor).await.unwrap();
    assert_eq!(summary.review_count, 1);
    assert_eq!(summary.average_rating, Some(4.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_external_review_upserts_per_platform(pool: PgPool) {
    ProfileRepo::create(&pool, 2, "contractor", &new_profile("Drew Builder"))
        .await
        .unwrap();
    let input = UpsertExternalReview {
        platform: "yelp".to_string(),
        url: "https://yelp.com/biz/drew".to_string(),
        rating: Some(4.5),
        review_count: Some(12),
    };
    let first = ExternalReviewRepo::upsert(&pool, 2, &input).await.unwrap();
    let second = ExternalReviewRepo::upsert(
        &pool,
        2,
        &UpsertExternalReview {
            review_count: Some(13),
            ..input
        },
    )
    .await
    .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.review_count, Some(13));

    assert!(!ExternalReviewRepo::delete(&pool, first.id, 99).await.unwrap());
    assert!(ExternalReviewRepo::delete(&pool, first.id, 2).await.unwrap());
}

// ---------------------------------------------------------------------------
// Warranty claims
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_warranty_claim_lifecycle_stamps_resolver(pool: PgPool) {
    let (client, contractor, _, booking_id) = seed_booking(&pool).await;
    let input = CreateWarrantyClaim {
        booking_id,
        description: "Gutter detached again after rain".to_string(),
        photo_urls: vec!["https://cdn.example.com/1.jpg".to_string()],
    };
    let claim = WarrantyClaimRepo::create(&pool, client, contractor, &input)
        .await
        .unwrap();
    assert_eq!(claim.status, "pending");

    let err = WarrantyClaimRepo::create(&pool, client, contractor, &input)
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, "uq_warranty_claims_booking_id"));

    let approved =
        WarrantyClaimRepo::transition_status(&pool, claim.id, "pending", "approved", None, None)
            .await
            .unwrap()
            .unwrap();
    assert!(approved.resolved_at.is_none());

    let resolved = WarrantyClaimRepo::transition_status(
        &pool,
        claim.id,
        "approved",
        "resolved",
        Some("Re-hung with new brackets"),
        Some(contractor),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(resolved.resolved_by, Some(contractor));
    assert!(resolved.resolved_at.is_some());
    assert_eq!(resolved.resolution_notes.as_deref(), Some("Re-hung with new brackets"));

    let visible = WarrantyClaimRepo::list(&pool, Some(client), None, 10, 0).await.unwrap();
    assert_eq!(visible.len(), 1);
    let none = WarrantyClaimRepo::list(&pool, Some(999), None, 10, 0).await.unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verification_submit_decide_and_background_check(pool: PgPool) {
    ProfileRepo::create(&pool, 2, "contractor", &new_profile("Drew Builder"))
        .await
        .unwrap();
    let input = SubmitVerification {
        license_number: Some("LIC-123".to_string()),
        license_type: Some("General".to_string()),
        license_expiry: Some(date(2028, 1, 1)),
        insurance_provider: Some("Acme Mutual".to_string()),
        insurance_expiry: None,
    };
    let v = VerificationRepo::submit(&pool, 2, &input).await.unwrap();
    assert_eq!(v.background_check_status, "not_started");
    assert!(!v.is_verified);

    let rejected =
        VerificationRepo::record_decision(&pool, 2, false, Some("Expired insurance"), &BONUS)
            .await
            .unwrap()
            .unwrap();
    assert!(!rejected.bonus_awarded);
    let rejected = rejected.verification;
    assert!(!rejected.is_verified);
    assert!(rejected.admin_verified_at.is_some());

    // Resubmission clears the previous decision.
    let resubmitted = VerificationRepo::submit(&pool, 2, &input).await.unwrap();
    assert_eq!(resubmitted.id, v.id);
    assert!(resubmitted.rejection_reason.is_none());
    assert!(resubmitted.admin_verified_at.is_none());

    let pending = VerificationRepo::transition_background_check(
        &pool,
        2,
        "not_started",
        "pending",
        Some("cand_abc"),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(pending.background_check_candidate_id.as_deref(), Some("cand_abc"));
    assert!(pending.background_check_date.is_some());

    let stale =
        VerificationRepo::transition_background_check(&pool, 2, "not_started", "pending", None)
            .await
            .unwrap();
    assert!(stale.is_none());

    let queue = VerificationRepo::list(&pool, Some(false), Some("pending"), 10, 0)
        .await
        .unwrap();
    assert_eq!(queue.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approval_bonus_credited_once(pool: PgPool) {
    ProfileRepo::create(&pool, 2, "contractor", &new_profile("Drew Builder"))
        .await
        .unwrap();
    let input = SubmitVerification {
        license_number: Some("LIC-123".to_string()),
        license_type: None,
        license_expiry: None,
        insurance_provider: None,
        insurance_expiry: None,
    };
    VerificationRepo::submit(&pool, 2, &input).await.unwrap();

    let first = VerificationRepo::record_decision(&pool, 2, true, None, &BONUS)
        .await
        .unwrap()
        .unwrap();
    assert!(first.bonus_awarded);
    assert!(first.verification.is_verified);

    // Resubmitting resets the decision but not the bonus.
    VerificationRepo::submit(&pool, 2, &input).await.unwrap();
    let again = VerificationRepo::record_decision(&pool, 2, true, None, &BONUS)
        .await
        .unwrap()
        .unwrap();
    assert!(!again.bonus_awarded);
    assert_eq!(PointsRepo::balance(&pool, 2).await.unwrap(), 200);

    let missing = VerificationRepo::record_decision(&pool, 99, true, None, &BONUS)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completion_award_shares_the_transition(pool: PgPool) {
    let (client, _contractor, _package_id, booking_id) = seed_booking(&pool).await;
    let award = PointsAward {
        points_amount: 50,
        description: "Booking completed",
    };

    let stale = BookingRepo::transition_status_with_award(
        &pool, booking_id, "confirmed", "completed", None, &award,
    )
    .await
    .unwrap();
    assert!(stale.is_none());
    assert_eq!(PointsRepo::balance(&pool, client).await.unwrap(), 0);

    BookingRepo::transition_status(&pool, booking_id, "pending", "confirmed", None)
        .await
        .unwrap()
        .unwrap();
    let completed = BookingRepo::transition_status_with_award(
        &pool, booking_id, "confirmed", "completed", None, &award,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(completed.status, "completed");

    let ledger = PointsRepo::list_for_user(&pool, client, 10, 0).await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].booking_id, Some(booking_id));
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_availability_round_trip(pool: PgPool) {
    ProfileRepo::create(&pool, 2, "contractor", &new_profile("Drew Builder"))
        .await
        .unwrap();

    let weekly = build_slot(true, Some(1), None, None, time(8), time(12)).unwrap();
    let range = build_slot(false, None, Some(date(2026, 7, 1)), None, time(13), time(17)).unwrap();

    let a = assert_matches!(
        AvailabilityRepo::create(&pool, 2, &weekly).await.unwrap(),
        SlotWrite::Written(row) => row
    );
    let b = assert_matches!(
        AvailabilityRepo::create(&pool, 2, &range).await.unwrap(),
        SlotWrite::Written(row) => row
    );
    assert_eq!(a.day_of_week, Some(1));
    assert_eq!(b.end_date, Some(date(2026, 7, 1)));
    assert_eq!(b.to_slot().unwrap(), range);

    let listed = AvailabilityRepo::list_for_contractor(&pool, 2).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].is_recurring);

    // Same weekday, intersecting window.
    let clash = build_slot(true, Some(1), None, None, time(11), time(14)).unwrap();
    assert_matches!(
        AvailabilityRepo::create(&pool, 2, &clash).await.unwrap(),
        SlotWrite::Overlaps
    );
    // Replacing a slot does not clash with itself.
    let widened = build_slot(true, Some(1), None, None, time(7), time(12)).unwrap();
    assert_matches!(
        AvailabilityRepo::update(&pool, 2, a.id, &widened).await.unwrap(),
        Some(SlotWrite::Written(_))
    );
    // Another contractor's id is not found.
    assert!(AvailabilityRepo::update(&pool, 3, a.id, &widened).await.unwrap().is_none());

    let moved = build_slot(true, Some(3), None, None, time(9), time(10)).unwrap();
    let updated = assert_matches!(
        AvailabilityRepo::update(&pool, 2, a.id, &moved).await.unwrap(),
        Some(SlotWrite::Written(row)) => row
    );
    assert_eq!(updated.day_of_week, Some(3));

    assert!(AvailabilityRepo::delete(&pool, a.id).await.unwrap());
    assert!(!AvailabilityRepo::delete(&pool, a.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_availability_check_constraint_rejects_bad_shape(pool: PgPool) {
    ProfileRepo::create(&pool, 2, "contractor", &new_profile("Drew Builder"))
        .await
        .unwrap();
    let err = sqlx::query(
        "INSERT INTO availability_slots (contractor_id, is_recurring, day_of_week, start_time, end_time)
         VALUES (2, TRUE, 7, '09:00', '10:00')",
    )
    .execute(&pool)
    .await
    .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23514"));
}
