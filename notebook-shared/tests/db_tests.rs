/// Integration tests for the connection pool and embedded migrations
///
/// Every test opens its own in-memory SQLite database, so they can run in
/// parallel without a server.

use notebook_shared::db::migrations::{embedded_migration_count, get_migration_status, run_migrations};
use notebook_shared::db::pool::{close_pool, create_pool, get_pool_stats, health_check, DatabaseConfig};

#[tokio::test]
async fn test_create_pool_success() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let stats = get_pool_stats(&pool);
    assert!(stats.total_connections > 0, "Pool should have at least one connection");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_create_pool_with_invalid_url() {
    let config = DatabaseConfig {
        url: "sqlite:///nonexistent-directory/nested/notebook.db".to_string(),
        ..DatabaseConfig::in_memory()
    };

    let result = create_pool(config).await;
    assert!(result.is_err(), "Should fail when the database file cannot be created");
}

#[tokio::test]
async fn test_health_check_success() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    assert!(health_check(&pool).await.is_ok(), "Health check should succeed");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_pool_query_execution() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let row: (i64,) = sqlx::query_as("SELECT ?")
        .bind(42i64)
        .fetch_one(&pool)
        .await
        .expect("Failed to execute query");

    assert_eq!(row.0, 42);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_close_pool() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    close_pool(pool.clone()).await;

    let result: Result<(i64,), _> = sqlx::query_as("SELECT 1").fetch_one(&pool).await;
    assert!(result.is_err(), "Queries should fail after pool is closed");
}

#[tokio::test]
async fn test_status_before_migrations() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let status = get_migration_status(&pool).await.expect("Failed to get status");
    assert_eq!(status.applied_migrations, 0);
    assert!(status.latest_version.is_none());
    assert!(!status.is_up_to_date);
}

#[tokio::test]
async fn test_run_migrations() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    run_migrations(&pool).await.expect("Migrations failed");

    let status = get_migration_status(&pool).await.expect("Failed to get status");
    assert_eq!(status.applied_migrations, embedded_migration_count());
    assert_eq!(status.latest_version, Some(20250101000004));
    assert!(status.is_up_to_date);

    for table in ["users", "sessions", "authors", "notes", "posts"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .expect("Failed to query sqlite_master");
        assert!(exists, "Table {} should exist", table);
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    run_migrations(&pool).await.expect("First migration run failed");
    let status_1 = get_migration_status(&pool).await.expect("Failed to get status");

    run_migrations(&pool).await.expect("Second migration run failed");
    let status_2 = get_migration_status(&pool).await.expect("Failed to get status");

    assert_eq!(status_1.applied_migrations, status_2.applied_migrations);
}

#[tokio::test]
async fn test_foreign_keys_enforced() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");
    run_migrations(&pool).await.expect("Migrations failed");

    let result = sqlx::query(
        "INSERT INTO notes (title, content, author_id, created_at, modified_at) \
         VALUES ('t', 'c', 999, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "A note must reference an existing user");
}
