//! The maison content engine.
//!
//! One handle, [`ContentEngine`], carries the database pool and the
//! resolved-content cache. Mutations go through the pipeline modules
//! (atomic multi-row writes, then tag invalidation after commit);
//! reads go through [`ContentEngine::resolve`], which is cache-first.

use std::sync::Arc;
use std::time::Duration;

use maison_core::error::CoreError;
use maison_db::DbPool;

use crate::cache::ContentCache;
use crate::resolver::HomepageContent;

pub mod cache;
pub mod pipeline;
pub mod resolver;

/// Engine-level error: domain errors plus storage errors propagated
/// unchanged (no automatic retry).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(sqlx::Error),
}

/// Convenience alias for engine operation results.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<sqlx::Error> for EngineError {
    /// Classify constraint violations as domain conflicts; everything
    /// else stays a storage error.
    ///
    /// - `23505` (unique violation): duplicate slug or translation row.
    /// - `23503` (foreign key violation): a delete blocked by a row
    ///   still referencing the target.
    fn from(err: sqlx::Error) -> EngineError {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                    return EngineError::Core(CoreError::Conflict(format!(
                        "Duplicate value violates unique constraint: {constraint}"
                    )));
                }
                Some("23503") => {
                    return EngineError::Core(CoreError::Conflict(
                        "Operation blocked by an existing reference".to_string(),
                    ));
                }
                _ => {}
            }
        }
        EngineError::Storage(err)
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Freshness window for cached resolved content. Staleness is
    /// bounded by this even if an invalidation is missed.
    pub cache_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_ttl: Duration::from_secs(60),
        }
    }
}

impl EngineConfig {
    /// Build from the environment, loading `.env` first. Unset or
    /// unparsable variables fall back to the defaults.
    ///
    /// - `CACHE_TTL_SECS`: freshness window for resolved content.
    pub fn from_env() -> EngineConfig {
        dotenvy::dotenv().ok();

        let cache_ttl = std::env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| EngineConfig::default().cache_ttl);

        EngineConfig { cache_ttl }
    }
}

/// The content-graph engine. Cheaply cloneable; shared state is behind
/// `Arc` or is a pool handle.
#[derive(Clone)]
pub struct ContentEngine {
    pool: DbPool,
    cache: Arc<ContentCache<HomepageContent>>,
}

impl ContentEngine {
    pub fn new(pool: DbPool, config: EngineConfig) -> ContentEngine {
        ContentEngine {
            pool,
            cache: Arc::new(ContentCache::new(config.cache_ttl)),
        }
    }

    /// The underlying pool, for read paths that bypass the engine's
    /// operations (admin listings, health checks).
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub(crate) fn cache(&self) -> &ContentCache<HomepageContent> {
        &self.cache
    }
}
