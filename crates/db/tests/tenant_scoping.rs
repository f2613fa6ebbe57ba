//! Integration tests for family-scoped repositories.
//!
//! Every family-owned row is looked up by `(family_id, id)`, so rows from
//! another family must be invisible to reads, updates and deletes.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use babycontrol_db::models::baby::{CreateBaby, UpdateBaby};
use babycontrol_db::models::caretaker::CreateCaretaker;
use babycontrol_db::models::family_setup::{FamilySetup, SetupOrigin, SetupOutcome};
use babycontrol_db::models::feed_log::CreateFeedLog;
use babycontrol_db::models::log_filter::LogFilter;
use babycontrol_db::models::setup_token::CreateSetupToken;
use babycontrol_db::models::sleep_log::CreateSleepLog;
use babycontrol_db::repositories::{
    BabyRepo, CaretakerRepo, FeedLogRepo, SetupRepo, SetupTokenRepo, SleepLogRepo, TimelineRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_family(pool: &PgPool, slug: &str) -> i64 {
    let token = SetupTokenRepo::create(
        pool,
        &CreateSetupToken {
            token_hash: format!("hash-{slug}"),
            password_hash: "hash".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            created_by: "sysadmin".to_string(),
        },
    )
    .await
    .unwrap();

    let input = FamilySetup {
        slug: slug.to_string(),
        name: slug.to_string(),
        security_pin_hash: "pin-hash".to_string(),
        auth_type: "SYSTEM".to_string(),
        caretakers: Vec::new(),
        baby: None,
        origin: SetupOrigin::Token(token.id),
    };
    match SetupRepo::create_family(pool, &input).await.unwrap() {
        SetupOutcome::Created(created) => created.family.id,
        other => panic!("unexpected setup outcome: {other:?}"),
    }
}

async fn new_baby(pool: &PgPool, family_id: i64) -> i64 {
    let input = CreateBaby {
        first_name: "Baby".to_string(),
        last_name: None,
        birth_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        gender: None,
        feed_warning_time: Some("02:30".to_string()),
        diaper_warning_time: None,
    };
    BabyRepo::create(pool, family_id, &input).await.unwrap().id
}

fn filter(family_id: i64) -> LogFilter {
    LogFilter {
        family_id,
        baby_id: None,
        start: None,
        end: None,
        limit: 100,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn baby_is_invisible_to_other_family(pool: PgPool) {
    let family_a = new_family(&pool, "family-a").await;
    let family_b = new_family(&pool, "family-b").await;
    let baby = new_baby(&pool, family_a).await;

    assert!(BabyRepo::find_by_id(&pool, family_a, baby).await.unwrap().is_some());
    assert!(BabyRepo::find_by_id(&pool, family_b, baby).await.unwrap().is_none());
    assert!(!BabyRepo::belongs_to_family(&pool, family_b, baby).await.unwrap());

    let patch = UpdateBaby {
        first_name: Some("Intruder".to_string()),
        ..Default::default()
    };
    assert!(BabyRepo::update(&pool, family_b, baby, &patch).await.unwrap().is_none());
    assert!(!BabyRepo::soft_delete(&pool, family_b, baby).await.unwrap());
    assert!(BabyRepo::soft_delete(&pool, family_a, baby).await.unwrap());
    assert!(!BabyRepo::soft_delete(&pool, family_a, baby).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_id_is_unique_per_family_only(pool: PgPool) {
    let family_a = new_family(&pool, "family-a").await;
    let family_b = new_family(&pool, "family-b").await;

    let caretaker = |family_id| CreateCaretaker {
        family_id,
        login_id: "07".to_string(),
        name: "Nanny".to_string(),
        caretaker_type: None,
        role: "USER".to_string(),
        security_pin_hash: "hash".to_string(),
    };

    let first = CaretakerRepo::create(&pool, &caretaker(family_a)).await.unwrap();
    CaretakerRepo::create(&pool, &caretaker(family_b)).await.unwrap();
    assert!(CaretakerRepo::create(&pool, &caretaker(family_a)).await.is_err());

    // A soft-deleted caretaker frees its login id.
    assert!(CaretakerRepo::soft_delete(&pool, family_a, first.id).await.unwrap());
    assert!(CaretakerRepo::create(&pool, &caretaker(family_a)).await.is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logs_and_timeline_are_family_scoped(pool: PgPool) {
    let family_a = new_family(&pool, "family-a").await;
    let family_b = new_family(&pool, "family-b").await;
    let baby = new_baby(&pool, family_a).await;
    let now = Utc::now();

    let sleep = CreateSleepLog {
        baby_id: baby,
        start_time: now - Duration::hours(2),
        end_time: Some(now - Duration::hours(1)),
        sleep_type: "NAP".to_string(),
        location: None,
        quality: Some("GOOD".to_string()),
    };
    let sleep = SleepLogRepo::create(&pool, family_a, None, &sleep, Some(60)).await.unwrap();
    assert_eq!(sleep.duration_minutes, Some(60));

    let feed = CreateFeedLog {
        baby_id: baby,
        time: now,
        feed_type: "BOTTLE".to_string(),
        amount: Some(4.0),
        unit_abbr: Some("OZ".to_string()),
        side: None,
        food: None,
        feed_duration_seconds: None,
    };
    FeedLogRepo::create(&pool, family_a, None, &feed).await.unwrap();

    assert_eq!(SleepLogRepo::list(&pool, &filter(family_a)).await.unwrap().len(), 1);
    assert!(SleepLogRepo::list(&pool, &filter(family_b)).await.unwrap().is_empty());
    assert!(SleepLogRepo::find_by_id(&pool, family_b, sleep.id).await.unwrap().is_none());

    let timeline = TimelineRepo::list(&pool, &filter(family_a)).await.unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].kind, "feed", "newest entry comes first");
    assert_eq!(timeline[1].kind, "sleep");
    assert!(TimelineRepo::list(&pool, &filter(family_b)).await.unwrap().is_empty());

    assert!(SleepLogRepo::soft_delete(&pool, family_a, sleep.id).await.unwrap());
    assert_eq!(TimelineRepo::list(&pool, &filter(family_a)).await.unwrap().len(), 1);
}
