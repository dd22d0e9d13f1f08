//! Registrar entry-point: loads configuration, connects the stores and
//! serves the HTTP API.

mod server;

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use registrar::inbound::http::health::HealthState;
use registrar::inbound::http::session_config::{BuildMode, load_session_settings};
use registrar::outbound::document::RedisCollections;
use registrar::outbound::notification::HttpRelayNotifier;
use registrar::outbound::persistence::{DbPool, PoolConfig};
use registrar::settings::RegistrarSettings;

use server::{ServerConfig, create_server};

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RegistrarSettings::load().wrap_err("failed to load configuration")?;
    let session = load_session_settings(
        &settings.session_key_file(),
        settings.cookie_secure,
        BuildMode::from_debug_assertions(),
    )?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(session, bind_addr)
        .with_initial_backend(settings.default_backend()?)
        .with_lock_timeout(settings.course_lock_timeout())
        .with_notification_policy(settings.notification_policy());

    if let Some(url) = settings.database_url.as_deref() {
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database URL configured; relational store holds no data");
    }

    if let Some(url) = settings.redis_url.as_deref() {
        let collections = RedisCollections::connect(url, settings.document_namespace())
            .await
            .wrap_err("failed to connect to the document store")?;
        config = config.with_document_collections(Arc::new(collections));
    } else {
        info!("no Redis URL configured; using in-process document collections");
    }

    if let Some(relay) = settings.notification_relay_url.as_deref() {
        let endpoint = Url::parse(relay).wrap_err("invalid notification relay URL")?;
        let notifier = HttpRelayNotifier::new(endpoint, RELAY_TIMEOUT)
            .wrap_err("failed to build notification client")?;
        config = config.with_notifier(Arc::new(notifier));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting registrar");
    create_server(health_state, config)?.await?;
    Ok(())
}
