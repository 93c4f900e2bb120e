//! Repository for the homepage module registry.

use maison_core::locale::Locale;
use maison_core::modules::ModuleKind;
use sqlx::PgPool;

use crate::models::module::{HomepageModule, UpsertModule};

/// Column list for `homepage_modules` queries.
const COLUMNS: &str =
    "id, slug, kind, locale, sort_order, config, active_from, active_to, updated_at";

/// Provides data access for homepage modules.
pub struct ModuleRepo;

impl ModuleRepo {
    /// Create or overwrite the single row for (kind, locale).
    pub async fn upsert(
        pool: &PgPool,
        kind: ModuleKind,
        locale: Locale,
        input: &UpsertModule,
    ) -> Result<HomepageModule, sqlx::Error> {
        let query = format!(
            "INSERT INTO homepage_modules
                (slug, kind, locale, sort_order, config, active_from, active_to)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (kind, locale) DO UPDATE SET
                slug = EXCLUDED.slug,
                sort_order = EXCLUDED.sort_order,
                config = EXCLUDED.config,
                active_from = EXCLUDED.active_from,
                active_to = EXCLUDED.active_to,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HomepageModule>(&query)
            .bind(&input.slug)
            .bind(kind.as_str())
            .bind(locale.as_str())
            .bind(input.sort_order)
            .bind(&input.config)
            .bind(input.active_from)
            .bind(input.active_to)
            .fetch_one(pool)
            .await
    }

    /// Load every module row for a locale, in display order.
    pub async fn list_for_locale(
        pool: &PgPool,
        locale: Locale,
    ) -> Result<Vec<HomepageModule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM homepage_modules
             WHERE locale = $1
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, HomepageModule>(&query)
            .bind(locale.as_str())
            .fetch_all(pool)
            .await
    }

    /// Find the single module row for (kind, locale).
    pub async fn find(
        pool: &PgPool,
        kind: ModuleKind,
        locale: Locale,
    ) -> Result<Option<HomepageModule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM homepage_modules
             WHERE kind = $1 AND locale = $2"
        );
        sqlx::query_as::<_, HomepageModule>(&query)
            .bind(kind.as_str())
            .bind(locale.as_str())
            .fetch_optional(pool)
            .await
    }
}
