//! Repository behaviour against a migrated Postgres database.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use ticketdesk_core::audit::{action_types, resource_types};
use ticketdesk_core::roles::{ALL_ROLES, ROLE_EVENT_MANAGER, ROLE_SUPER_ADMIN};
use ticketdesk_db::models::activity::CreateActivity;
use ticketdesk_db::models::admin::{Admin, CreateAdmin};
use ticketdesk_db::models::session::CreateSession;
use ticketdesk_db::models::two_factor_challenge::CreateTwoFactorChallenge;
use ticketdesk_db::repositories::{
    ActivityRepo, AdminRepo, RoleRepo, SessionRepo, TwoFactorChallengeRepo,
};

async fn create_admin(pool: &PgPool, username: &str) -> Admin {
    let role = RoleRepo::find_by_name(pool, ROLE_EVENT_MANAGER)
        .await
        .unwrap()
        .expect("seeded role must exist");
    AdminRepo::create(
        pool,
        &CreateAdmin {
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            email: format!("{username}@example.com"),
            full_name: "Test Admin".to_string(),
            role_id: role.id,
        },
    )
    .await
    .expect("admin insert should succeed")
}

fn session_for(admin_id: i64, token_hash: &str, expires_in: Duration) -> CreateSession {
    CreateSession {
        admin_id,
        token_hash: token_hash.to_string(),
        expires_at: Utc::now() + expires_in,
        user_agent: Some("repo-test".to_string()),
        ip_address: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn migrations_seed_every_role(pool: PgPool) {
    ticketdesk_db::health_check(&pool).await.unwrap();

    let roles = RoleRepo::list(&pool).await.unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ALL_ROLES.to_vec());

    let super_admin = RoleRepo::find_by_name(&pool, ROLE_SUPER_ADMIN)
        .await
        .unwrap()
        .unwrap();
    assert!(super_admin.permissions.iter().any(|p| p == "admins:manage"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_defaults_and_lookup(pool: PgPool) {
    let admin = create_admin(&pool, "boxoffice").await;
    assert!(admin.is_active);
    assert!(!admin.two_factor_enabled);
    assert!(admin.two_factor_secret.is_none());
    assert!(admin.last_login_at.is_none());

    let by_name = AdminRepo::find_by_username(&pool, "boxoffice")
        .await
        .unwrap()
        .expect("admin should be found by username");
    assert_eq!(by_name.id, admin.id);

    assert!(AdminRepo::find_by_username(&pool, "BoxOffice")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_is_rejected(pool: PgPool) {
    create_admin(&pool, "dupe").await;
    let role = RoleRepo::find_by_name(&pool, ROLE_EVENT_MANAGER)
        .await
        .unwrap()
        .unwrap();
    let result = AdminRepo::create(
        &pool,
        &CreateAdmin {
            username: "dupe".to_string(),
            password_hash: "x".to_string(),
            email: "other@example.com".to_string(),
            full_name: "Other".to_string(),
            role_id: role.id,
        },
    )
    .await;

    match result {
        Err(sqlx::Error::Database(db_err)) => {
            assert_eq!(db_err.constraint(), Some("uq_admins_username"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_login_and_active_flag(pool: PgPool) {
    let admin = create_admin(&pool, "flags").await;

    AdminRepo::record_login(&pool, admin.id).await.unwrap();
    assert!(!AdminRepo::set_active(&pool, admin.id, true).await.unwrap());
    assert!(AdminRepo::set_active(&pool, admin.id, false).await.unwrap());

    let reloaded = AdminRepo::find_by_id(&pool, admin.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
    assert!(!reloaded.is_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn two_factor_toggle(pool: PgPool) {
    let admin = create_admin(&pool, "totp").await;

    assert!(AdminRepo::enable_two_factor(&pool, admin.id, "00112233445566778899aabbccddeeff")
        .await
        .unwrap());
    let enabled = AdminRepo::find_by_id(&pool, admin.id).await.unwrap().unwrap();
    assert!(enabled.two_factor_enabled);
    assert_eq!(
        enabled.two_factor_secret.as_deref(),
        Some("00112233445566778899aabbccddeeff")
    );

    AdminRepo::disable_two_factor(&pool, admin.id).await.unwrap();
    let disabled = AdminRepo::find_by_id(&pool, admin.id).await.unwrap().unwrap();
    assert!(!disabled.two_factor_enabled);
    assert!(disabled.two_factor_secret.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_lifecycle(pool: PgPool) {
    let admin = create_admin(&pool, "sessions").await;

    SessionRepo::create(&pool, &session_for(admin.id, "live", Duration::hours(8)))
        .await
        .unwrap();
    SessionRepo::create(&pool, &session_for(admin.id, "stale", Duration::hours(-1)))
        .await
        .unwrap();

    assert!(SessionRepo::find_active_by_token_hash(&pool, "live")
        .await
        .unwrap()
        .is_some());
    assert!(SessionRepo::find_active_by_token_hash(&pool, "stale")
        .await
        .unwrap()
        .is_none());

    let owner = SessionRepo::invalidate_by_token_hash(&pool, "live").await.unwrap();
    assert_eq!(owner, Some(admin.id));
    // Second invalidation is a no-op.
    assert_eq!(
        SessionRepo::invalidate_by_token_hash(&pool, "live").await.unwrap(),
        None
    );
    assert!(SessionRepo::find_active_by_token_hash(&pool, "live")
        .await
        .unwrap()
        .is_none());

    let purged = SessionRepo::purge_expired(&pool).await.unwrap();
    assert_eq!(purged, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalidate_all_for_admin_only_touches_that_admin(pool: PgPool) {
    let a = create_admin(&pool, "alpha").await;
    let b = create_admin(&pool, "bravo").await;
    for (admin, hash) in [(&a, "a1"), (&a, "a2"), (&b, "b1")] {
        SessionRepo::create(&pool, &session_for(admin.id, hash, Duration::hours(1)))
            .await
            .unwrap();
    }

    assert_eq!(SessionRepo::invalidate_all_for_admin(&pool, a.id).await.unwrap(), 2);
    assert!(SessionRepo::find_active_by_token_hash(&pool, "b1")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activity_entries_are_sanitised_and_ordered(pool: PgPool) {
    let admin = create_admin(&pool, "auditor").await;

    for action in [action_types::LOGIN_FAILED, action_types::LOGIN] {
        ActivityRepo::create(
            &pool,
            &CreateActivity {
                admin_id: admin.id,
                action_type: action.to_string(),
                resource_type: resource_types::AUTH.to_string(),
                details: Some("attempt password=oops".to_string()),
                ip_address: Some("203.0.113.7".to_string()),
            },
        )
        .await
        .unwrap();
    }

    let entries = ActivityRepo::list_for_admin(&pool, admin.id, None).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action_type, action_types::LOGIN);
    assert_eq!(entries[1].action_type, action_types::LOGIN_FAILED);
    assert_eq!(
        entries[0].details.as_deref(),
        Some("attempt password=[REDACTED]")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn two_factor_step_only_moves_forward(pool: PgPool) {
    let admin = create_admin(&pool, "finance").await;

    assert!(AdminRepo::advance_two_factor_step(&pool, admin.id, 100).await.unwrap());
    assert!(!AdminRepo::advance_two_factor_step(&pool, admin.id, 100).await.unwrap());
    assert!(!AdminRepo::advance_two_factor_step(&pool, admin.id, 99).await.unwrap());
    assert!(AdminRepo::advance_two_factor_step(&pool, admin.id, 101).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn challenge_is_consumed_once(pool: PgPool) {
    let admin = create_admin(&pool, "finance").await;
    let challenge = TwoFactorChallengeRepo::create(
        &pool,
        &CreateTwoFactorChallenge {
            admin_id: admin.id,
            jti: "challenge-1".to_string(),
            expires_at: Utc::now() + Duration::minutes(5),
        },
    )
    .await
    .unwrap();
    assert_eq!(challenge.failed_attempts, 0);
    assert!(challenge.consumed_at.is_none());

    let open = TwoFactorChallengeRepo::find_open_by_jti(&pool, "challenge-1", 5)
        .await
        .unwrap();
    assert_eq!(open.map(|c| c.id), Some(challenge.id));

    assert!(TwoFactorChallengeRepo::consume(&pool, challenge.id, 5).await.unwrap());
    assert!(!TwoFactorChallengeRepo::consume(&pool, challenge.id, 5).await.unwrap());
    assert!(TwoFactorChallengeRepo::find_open_by_jti(&pool, "challenge-1", 5)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn challenge_closes_after_too_many_failures(pool: PgPool) {
    let admin = create_admin(&pool, "finance").await;
    let challenge = TwoFactorChallengeRepo::create(
        &pool,
        &CreateTwoFactorChallenge {
            admin_id: admin.id,
            jti: "challenge-2".to_string(),
            expires_at: Utc::now() + Duration::minutes(5),
        },
    )
    .await
    .unwrap();

    for _ in 0..3 {
        TwoFactorChallengeRepo::record_failure(&pool, challenge.id)
            .await
            .unwrap();
    }

    assert!(TwoFactorChallengeRepo::find_open_by_jti(&pool, "challenge-2", 3)
        .await
        .unwrap()
        .is_none());
    assert!(!TwoFactorChallengeRepo::consume(&pool, challenge.id, 3).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn purge_removes_expired_and_consumed_challenges(pool: PgPool) {
    let admin = create_admin(&pool, "finance").await;
    let mut ids = Vec::new();
    for (jti, expires_in) in [
        ("live", Duration::minutes(5)),
        ("expired", Duration::minutes(-1)),
        ("used", Duration::minutes(5)),
    ] {
        let challenge = TwoFactorChallengeRepo::create(
            &pool,
            &CreateTwoFactorChallenge {
                admin_id: admin.id,
                jti: jti.to_string(),
                expires_at: Utc::now() + expires_in,
            },
        )
        .await
        .unwrap();
        ids.push(challenge.id);
    }
    TwoFactorChallengeRepo::consume(&pool, ids[2], 5).await.unwrap();

    assert_eq!(TwoFactorChallengeRepo::purge_expired(&pool).await.unwrap(), 2);
    assert!(TwoFactorChallengeRepo::find_open_by_jti(&pool, "live", 5)
        .await
        .unwrap()
        .is_some());
}
