// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use clap::Parser;
use seo_agent::app::{create_router, AppState, VERSION};
use seo_agent::config::Config;
use seo_agent::services::analyzer::PageAnalyzer;
use seo_agent::services::logging::init_logging;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    init_logging();

    let analyzer =
        PageAnalyzer::new(config.analyzer_config()).context("Failed to initialize analyzer")?;

    let app = create_router(AppState {
        analyzer: Arc::new(analyzer),
    });

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        version = VERSION,
        %addr,
        fetch_timeout_secs = config.fetch_timeout_secs,
        probe_timeout_secs = config.probe_timeout_secs,
        "seo-agent listening"
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
