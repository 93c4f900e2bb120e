//! Schema bootstrap tests: programmatic migration runs against a bare
//! database, plus the connectivity check used at startup.

use sqlx::PgPool;

#[sqlx::test(migrations = false)]
async fn migrations_build_the_full_schema(pool: PgPool) {
    maison_db::run_migrations(&pool)
        .await
        .unwrap_or_else(|e| panic!("migrations failed: {e}"));

    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name FROM information_schema.tables
         WHERE table_schema = 'public'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();

    for expected in [
        "media_assets",
        "collections",
        "collection_translations",
        "sections",
        "section_translations",
        "lookbook_slides",
        "lookbook_slide_translations",
        "collection_products",
        "editorial_posts",
        "editorial_post_translations",
        "editorial_blocks",
        "editorial_block_translations",
        "editorial_features",
        "homepage_modules",
    ] {
        assert!(names.contains(&expected), "missing table {expected}");
    }
}

#[sqlx::test(migrations = false)]
async fn migrations_are_idempotent(pool: PgPool) {
    maison_db::run_migrations(&pool).await.unwrap();
    // A second run finds every migration already applied.
    maison_db::run_migrations(&pool).await.unwrap();
}

#[sqlx::test(migrations = false)]
async fn health_check_reaches_the_database(pool: PgPool) {
    maison_db::health_check(&pool).await.unwrap();
}
