//! Note-analysis service binary.

use std::sync::Arc;

use healthcare_copilot::analysis::AnalysisEngine;
use healthcare_copilot::api::{analysis_router, serve, AnalysisApiContext};
use healthcare_copilot::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    healthcare_copilot::init_tracing();
    let config = ServiceConfig::from_env();

    let extractor = config.text_analytics_client();
    if extractor.is_none() {
        tracing::info!("no text-analytics credentials, running with deterministic fallbacks");
    }

    let ctx = AnalysisApiContext {
        engine: Arc::new(AnalysisEngine::new(extractor)),
        http: reqwest::Client::new(),
        records_base_url: config.records_base_url.clone(),
    };

    let router = analysis_router(ctx, config.signer());
    serve(router, config.analysis_addr).await?;
    Ok(())
}
