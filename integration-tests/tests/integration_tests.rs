// Integration tests for the bot data layer
// These tests verify the full path through the pool, schema bootstrap and
// repositories against a live PostgreSQL.
// Run with: cargo test -p integration-tests -- --ignored

use botdata::config::DatabaseConfig;
use botdata::db::repositories::{GuildRepository, PermissionRepository, UserRepository};
use botdata::db::{schema, DbPool};
use botdata::models::{GuildSettings, PermissionEntry, UserSettings};

/// Connection parameters for the test database, overridable via environment
fn test_database_config() -> DatabaseConfig {
    DatabaseConfig {
        host: std::env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: std::env::var("POSTGRES_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5432),
        username: std::env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string()),
        password: std::env::var("POSTGRES_PASSWORD").unwrap_or_else(|_| "postgres".to_string()),
        database: std::env::var("POSTGRES_DB").unwrap_or_else(|_| "botdata_test".to_string()),
        max_connections: 10,
        connect_timeout_seconds: 3,
    }
}

/// Pool with tables created, shared setup for every test
async fn setup() -> DbPool {
    let pool = DbPool::new(&test_database_config());
    schema::initialize(&pool)
        .await
        .expect("Failed to create database tables");
    pool
}

/// Fresh id per test so runs never interfere with each other
fn unique_id() -> i64 {
    (rand::random::<u64>() >> 1) as i64
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_schema_initialize_is_idempotent() {
    let pool = setup().await;
    let guilds = GuildRepository::new(pool.clone());
    let guild_id = unique_id();

    assert!(guilds.init(guild_id).await.unwrap());
    guilds.set_prefix(guild_id, "$").await.unwrap();

    // A restart re-runs the bootstrap; existing data must survive.
    schema::initialize(&pool).await.unwrap();

    let settings = guilds.get(guild_id).await.unwrap().unwrap();
    assert_eq!(settings.prefix, "$");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_initialize_guild_inserts_defaults_exactly_once() {
    let pool = setup().await;
    let guilds = GuildRepository::new(pool.clone());
    let guild_id = unique_id();

    assert!(guilds.init(guild_id).await.unwrap());
    assert!(!guilds.init(guild_id).await.unwrap());
    assert!(!guilds.init(guild_id).await.unwrap());

    let settings = guilds.get(guild_id).await.unwrap().unwrap();
    assert_eq!(settings, GuildSettings::with_defaults(guild_id));
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_get_guild_without_row_returns_none() {
    let pool = setup().await;
    let guilds = GuildRepository::new(pool.clone());

    // Never initialized: absent result, not a default-valued record.
    assert_eq!(guilds.get(unique_id()).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_set_guild_prefix_leaves_language_untouched() {
    let pool = setup().await;
    let guilds = GuildRepository::new(pool.clone());
    let guild_id = unique_id();

    assert!(guilds.init(guild_id).await.unwrap());
    guilds.set_prefix(guild_id, "?!").await.unwrap();

    let settings = guilds.get(guild_id).await.unwrap().unwrap();
    assert_eq!(
        settings,
        GuildSettings {
            guild_id,
            prefix: "?!".to_string(),
            language: GuildSettings::DEFAULT_LANGUAGE.to_string(),
        }
    );
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_update_on_missing_row_succeeds_silently() {
    let pool = setup().await;
    let guilds = GuildRepository::new(pool.clone());

    // Zero affected rows is not an error and not distinguishable here.
    guilds.set_prefix(unique_id(), "!").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_user_settings_roundtrip() {
    let pool = setup().await;
    let users = UserRepository::new(pool.clone());
    let user_id = unique_id();

    assert!(users.init(user_id).await.unwrap());
    users.set_language(user_id, "de").await.unwrap();
    users.set_prefix(user_id, "%").await.unwrap();

    let settings = users.get(user_id).await.unwrap().unwrap();
    assert_eq!(
        settings,
        UserSettings {
            user_id,
            prefix: "%".to_string(),
            language: "de".to_string(),
        }
    );
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_concurrent_user_initialize_has_a_single_winner() {
    let pool = setup().await;
    let users = UserRepository::new(pool.clone());
    let user_id = unique_id();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let users = users.clone();
        handles.push(tokio::spawn(async move { users.init(user_id).await }));
    }

    let results = futures::future::join_all(handles).await;
    let inserted = results
        .into_iter()
        .map(|r| r.expect("task panicked").expect("init failed"))
        .filter(|inserted| *inserted)
        .count();
    assert_eq!(inserted, 1);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_permissions_return_exact_match_set() {
    let pool = setup().await;
    let permissions = PermissionRepository::new(pool.clone());
    let guild_id = unique_id();
    let other_guild = unique_id();

    let rules = vec![
        PermissionEntry {
            permission_name: "ban".to_string(),
            guild_id,
            target_id: 100,
            is_user: true,
            is_whitelist: true,
        },
        PermissionEntry {
            permission_name: "ban".to_string(),
            guild_id,
            target_id: 100,
            is_user: false,
            is_whitelist: false,
        },
        PermissionEntry {
            permission_name: "ban".to_string(),
            guild_id,
            target_id: 200,
            is_user: true,
            is_whitelist: false,
        },
    ];
    for rule in &rules {
        permissions.set(rule).await.unwrap();
    }
    // Same permission in another guild must not leak into the result.
    permissions
        .set(&PermissionEntry {
            permission_name: "ban".to_string(),
            guild_id: other_guild,
            target_id: 100,
            is_user: true,
            is_whitelist: true,
        })
        .await
        .unwrap();

    let mut fetched = permissions.get_all("ban", guild_id).await.unwrap();
    fetched.sort_by_key(|e| (e.target_id, e.is_user));
    let mut expected = rules;
    expected.sort_by_key(|e| (e.target_id, e.is_user));
    assert_eq!(fetched, expected);

    // No rules for this permission: empty, not an error.
    assert!(permissions.get_all("kick", guild_id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_permission_set_overwrites_existing_rule() {
    let pool = setup().await;
    let permissions = PermissionRepository::new(pool.clone());
    let guild_id = unique_id();

    let mut rule = PermissionEntry {
        permission_name: "mute".to_string(),
        guild_id,
        target_id: 1,
        is_user: true,
        is_whitelist: true,
    };
    permissions.set(&rule).await.unwrap();

    rule.is_whitelist = false;
    permissions.set(&rule).await.unwrap();

    let fetched = permissions.get_all("mute", guild_id).await.unwrap();
    assert_eq!(fetched, vec![rule]);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_permission_remove_reports_whether_a_rule_existed() {
    let pool = setup().await;
    let permissions = PermissionRepository::new(pool.clone());
    let guild_id = unique_id();

    let rule = PermissionEntry {
        permission_name: "kick".to_string(),
        guild_id,
        target_id: 7,
        is_user: false,
        is_whitelist: true,
    };
    permissions.set(&rule).await.unwrap();

    assert!(permissions.remove("kick", guild_id, 7, false).await.unwrap());
    assert!(!permissions.remove("kick", guild_id, 7, false).await.unwrap());
    assert!(permissions.get_all("kick", guild_id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_pool_shutdown_rejects_further_work() {
    let pool = setup().await;
    let guilds = GuildRepository::new(pool.clone());

    pool.close().await;

    assert!(guilds.init(unique_id()).await.is_err());
}
