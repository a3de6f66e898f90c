use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    galeria_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "user_sessions",
        "artworks",
        "digital_art",
        "orders",
        "order_items",
        "order_status_history",
        "contact_messages",
        "newsletter_subscribers",
        "site_info",
        "admin_contacts",
        "admin_contact_history",
        "finance_transactions",
        "budgets",
        "agenda_events",
        "tasks",
        "notes",
        "activity_logs",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The site info row is pinned to id 1.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_site_info_is_a_singleton(pool: PgPool) {
    let result = sqlx::query("INSERT INTO site_info (id) VALUES (2)")
        .execute(&pool)
        .await;
    assert!(result.is_err(), "site_info must reject ids other than 1");
}
