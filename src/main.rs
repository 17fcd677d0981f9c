// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use jobscout::application::session::ScrapeSession;
use jobscout::config::settings::Settings;
use jobscout::domain::scraping::provider::ScrapeProvider;
use jobscout::domain::services::ranking_service::parse_keywords;
use jobscout::infrastructure::browse_ai::client::BrowseAiClient;
use jobscout::presentation::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use jobscout::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting jobscout...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    jobscout::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Browse.ai client
    let client = BrowseAiClient::new(&settings.browse_ai)?;
    if !client.is_configured() {
        warn!("BROWSE_API_KEY or ROBOT_ID is not set; scrape requests will fail with 500");
    }
    let provider: Arc<dyn ScrapeProvider> = Arc::new(client);

    // 4. Scrape session
    let session = Arc::new(ScrapeSession::new(
        provider.clone(),
        &settings.polling,
        parse_keywords(&settings.ranking.default_keywords),
    ));

    // 5. Start HTTP server
    let app = routes::build_app(settings.clone(), provider, session.clone());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session.cancel().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}
