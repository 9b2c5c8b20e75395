//! Serve command - starts the API server.

use anyhow::{Context, Result};
use colored::Colorize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use gd_api::{ApiServer, ApiServerConfig, AppState};
use gd_connectors::{AggregatorConfig, CamaraConnector, ConnectorConfig, PropositionAggregator};
use gd_core::db::{create_pool, run_migrations, seed_defaults, DbPool};
use gd_core::{parse_ttl, TokenIssuer};

use crate::config::AppConfig;

/// Opens the database, applies migrations and seeds the default records.
pub async fn prepare_database(config: &AppConfig) -> Result<DbPool> {
    println!("  {} Database: {}", "→".green(), config.redact_secrets().database.url);
    let db_pool = create_pool(&config.database.url)
        .await
        .context("Failed to create database connection pool")?;

    println!("  {} Running migrations...", "→".green());
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    let report = seed_defaults(&db_pool, &config.master_account().seed_options())
        .await
        .context("Failed to seed default records")?;
    info!(
        master_user_created = report.master_user_created,
        organization_types = report.organization_types,
        person_types = report.person_types,
        "Seeded default records"
    );

    println!("  {} Migrations complete", "✓".green());
    Ok(db_pool)
}

/// Builds the Câmara aggregator from configuration.
fn build_aggregator(config: &AppConfig) -> Result<PropositionAggregator> {
    let mut connector_config = ConnectorConfig::new("camara", config.camara.base_url.clone());
    connector_config.timeout_secs = config.camara.timeout_secs;
    connector_config.max_retries = config.camara.max_retries;

    let connector =
        CamaraConnector::new(connector_config).context("Failed to create Câmara client")?;

    Ok(PropositionAggregator::new(
        Arc::new(connector),
        AggregatorConfig::new(
            config.camara.deputy_id,
            config.camara.parliamentarian_name.clone(),
        ),
    ))
}

/// Runs the API server.
pub async fn run_server(config: AppConfig) -> Result<()> {
    println!("{} Starting Gabinete Digital API...", "[server]".cyan());

    let ttl = parse_ttl(&config.auth.token_time)
        .with_context(|| format!("Invalid TOKEN_TIME: {}", config.auth.token_time))?;
    let tokens = TokenIssuer::new(&config.auth.secret_key, ttl)
        .context("Failed to configure token signing")?;

    let db_pool = prepare_database(&config).await?;
    let propositions = build_aggregator(&config)?;
    let state = AppState::new(db_pool, tokens, config.master_account(), propositions);

    let bind_address: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    let server_config = ApiServerConfig {
        bind_address,
        cors_origins: config.server.cors_origins.clone(),
        shutdown_timeout: Duration::from_secs(30),
    };

    println!();
    println!("{}", "Gabinete Digital API".bold());
    println!("{}", "═".repeat(40));
    println!("  {} http://{}", "Address:".cyan(), bind_address);
    println!("  {} {}", "Câmara:".cyan(), config.camara.base_url);
    println!("  {} {}", "Deputy:".cyan(), config.camara.deputy_id);
    println!();
    println!("Press {} to stop", "Ctrl+C".yellow());
    println!();

    let server = ApiServer::new(state, server_config);
    server.run().await.context("Server error")?;

    println!();
    println!("{} Server stopped", "[server]".cyan());

    Ok(())
}
