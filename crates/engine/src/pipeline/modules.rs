//! Homepage module configuration writes.

use maison_core::error::CoreError;
use maison_core::locale::Locale;
use maison_core::modules::{ModuleConfig, ModuleKind};
use maison_db::models::module::{HomepageModule, UpsertModule};
use maison_db::repositories::ModuleRepo;

use crate::cache::CacheTag;
use crate::{ContentEngine, EngineResult};

impl ContentEngine {
    /// Create or overwrite the single config slot for (kind, locale).
    ///
    /// The payload is validated against the kind's schema before the
    /// write, so an invalid config never reaches the resolver.
    pub async fn upsert_module(
        &self,
        kind: &str,
        locale: Locale,
        input: UpsertModule,
    ) -> EngineResult<HomepageModule> {
        let kind = ModuleKind::parse(kind)?;

        // At save time a bad payload is the admin's mistake, not a
        // deploy-blocking configuration failure.
        ModuleConfig::from_stored(kind, &input.config).map_err(|err| match err {
            CoreError::Configuration(msg) => CoreError::Validation(msg),
            other => other,
        })?;

        let module = ModuleRepo::upsert(self.pool(), kind, locale, &input).await?;
        tracing::info!(%kind, %locale, "Homepage module upserted");
        self.invalidate(&[CacheTag::Homepage]);
        Ok(module)
    }
}
