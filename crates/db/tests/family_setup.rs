//! Integration tests for transactional family setup.
//!
//! Verifies that:
//! - A token-backed setup creates the family, settings, caretakers and baby
//! - A consumed setup token cannot create a second family
//! - An account can only be linked to one family
//! - A duplicate slug rolls back the whole setup

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use babycontrol_db::models::account::CreateAccount;
use babycontrol_db::models::baby::CreateBaby;
use babycontrol_db::models::family_setup::{FamilySetup, SetupCaretaker, SetupOrigin, SetupOutcome};
use babycontrol_db::models::setup_token::CreateSetupToken;
use babycontrol_db::repositories::{
    AccountRepo, BabyRepo, CaretakerRepo, FamilyRepo, SettingsRepo, SetupRepo, SetupTokenRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_token(pool: &PgPool, hash: &str) -> i64 {
    let input = CreateSetupToken {
        token_hash: hash.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        expires_at: Utc::now() + Duration::hours(24),
        created_by: "sysadmin".to_string(),
    };
    SetupTokenRepo::create(pool, &input)
        .await
        .expect("token creation should succeed")
        .id
}

fn setup(slug: &str, origin: SetupOrigin) -> FamilySetup {
    FamilySetup {
        slug: slug.to_string(),
        name: "The Test Family".to_string(),
        security_pin_hash: "pin-hash".to_string(),
        auth_type: "CARETAKER".to_string(),
        caretakers: vec![SetupCaretaker {
            login_id: "01".to_string(),
            name: "Parent".to_string(),
            caretaker_type: Some("Parent".to_string()),
            role: "ADMIN".to_string(),
            security_pin_hash: "caretaker-pin-hash".to_string(),
        }],
        baby: Some(CreateBaby {
            first_name: "Ada".to_string(),
            last_name: None,
            birth_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            gender: Some("FEMALE".to_string()),
            feed_warning_time: None,
            diaper_warning_time: None,
        }),
        origin,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_setup_creates_all_rows(pool: PgPool) {
    let token_id = new_token(&pool, "hash-a").await;

    let outcome = SetupRepo::create_family(&pool, &setup("test-family", SetupOrigin::Token(token_id)))
        .await
        .unwrap();
    let created = assert_matches!(outcome, SetupOutcome::Created(c) => c);

    let family_id = created.family.id;
    assert_eq!(created.family.slug, "test-family");
    assert_eq!(created.settings.auth_type, "CARETAKER");
    assert_eq!(created.settings.default_bottle_unit, "OZ");
    assert_eq!(created.caretakers.len(), 1);
    let baby = created.baby.expect("baby should be created");
    assert_eq!(baby.feed_warning_time, "03:00");
    assert_eq!(baby.diaper_warning_time, "02:00");

    assert!(FamilyRepo::find_by_slug(&pool, "test-family").await.unwrap().is_some());
    assert!(SettingsRepo::find_by_family(&pool, family_id).await.unwrap().is_some());
    assert_eq!(CaretakerRepo::count_active(&pool, family_id).await.unwrap(), 1);
    assert_eq!(BabyRepo::list_by_family(&pool, family_id, false).await.unwrap().len(), 1);

    let token = SetupTokenRepo::find_by_id(&pool, token_id).await.unwrap().unwrap();
    assert!(token.used_at.is_some());
    assert_eq!(token.family_id, Some(family_id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn consumed_token_cannot_create_second_family(pool: PgPool) {
    let token_id = new_token(&pool, "hash-b").await;

    let first = SetupRepo::create_family(&pool, &setup("first-family", SetupOrigin::Token(token_id)))
        .await
        .unwrap();
    assert_matches!(first, SetupOutcome::Created(_));

    let second = SetupRepo::create_family(&pool, &setup("second-family", SetupOrigin::Token(token_id)))
        .await
        .unwrap();
    assert_matches!(second, SetupOutcome::TokenSpent);

    assert!(FamilyRepo::find_by_slug(&pool, "second-family").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn account_links_to_only_one_family(pool: PgPool) {
    let account = AccountRepo::create(
        &pool,
        &CreateAccount {
            email: "Owner@Example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Owner".to_string(),
            last_name: None,
            verification_token_hash: None,
            trial_ends_at: Some(Utc::now() + Duration::days(14)),
        },
    )
    .await
    .unwrap();
    assert_eq!(account.email, "owner@example.com");

    let first = SetupRepo::create_family(&pool, &setup("owned-family", SetupOrigin::Account(account.id)))
        .await
        .unwrap();
    let created = assert_matches!(first, SetupOutcome::Created(c) => c);

    let linked = AccountRepo::find_by_id(&pool, account.id).await.unwrap().unwrap();
    assert_eq!(linked.family_id, Some(created.family.id));

    let second = SetupRepo::create_family(&pool, &setup("other-family", SetupOrigin::Account(account.id)))
        .await
        .unwrap();
    assert_matches!(second, SetupOutcome::AccountAlreadyLinked);
    assert!(!FamilyRepo::slug_exists(&pool, "other-family").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_slug_rolls_back_token(pool: PgPool) {
    let first_token = new_token(&pool, "hash-c").await;
    let second_token = new_token(&pool, "hash-d").await;

    SetupRepo::create_family(&pool, &setup("taken-slug", SetupOrigin::Token(first_token)))
        .await
        .unwrap();

    let err = SetupRepo::create_family(&pool, &setup("taken-slug", SetupOrigin::Token(second_token)))
        .await
        .unwrap_err();
    let db_err = assert_matches!(err, sqlx::Error::Database(e) => e);
    assert_eq!(db_err.constraint(), Some("uq_families_slug"));

    let token = SetupTokenRepo::find_by_id(&pool, second_token).await.unwrap().unwrap();
    assert!(token.used_at.is_none(), "token must stay unused after rollback");
}
