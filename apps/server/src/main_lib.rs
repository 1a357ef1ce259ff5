use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use cgt_core::fx::{FxService, RateLookupTrait};
use cgt_core::{LedgerService, LedgerServiceTrait};
use cgt_market_data::{FrankfurterProvider, HistoricalRateResolver, ResolverSettings};
use cgt_storage_sqlite::{db, LedgerRepository};

pub struct AppState {
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CGT_LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("text") {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    } else {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    }
}

/// Builds the application state with rates fetched from the configured provider.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = Arc::new(FrankfurterProvider::new(config.rate_api_url.clone()));
    let settings = ResolverSettings {
        max_lookback_days: config.rate_lookback_days,
        ..ResolverSettings::default()
    };
    let resolver = Arc::new(HistoricalRateResolver::with_settings(provider, settings));
    tracing::info!(
        "Reference rates from {} (lookback {} days)",
        config.rate_api_url,
        config.rate_lookback_days
    );

    build_state_with_rates(config, Arc::new(FxService::new(resolver))).await
}

/// Builds the application state around an existing rate lookup.
pub async fn build_state_with_rates(
    config: &Config,
    rate_lookup: Arc<dyn RateLookupTrait>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let ledger_repository = Arc::new(LedgerRepository::new(pool, writer));
    let ledger_service: Arc<dyn LedgerServiceTrait> =
        Arc::new(LedgerService::new(ledger_repository, rate_lookup));

    Ok(Arc::new(AppState { ledger_service }))
}
