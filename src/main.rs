use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use site_search::config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_search=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    config::init_config()?;
    let app_config = config::config();
    tracing::info!("Server will listen on {}:{}", app_config.server.host, app_config.server.port);

    if app_config.search.enabled {
        tracing::info!(
            "Search enabled: page_size={}, site_url={}",
            app_config.page_size(),
            app_config.search.site_url
        );
    } else {
        tracing::warn!("Search is disabled in config.json");
    }

    // 索引在首次搜索时加载
    let state = Arc::new(AppState::from_config(app_config.clone())?);
    tracing::info!("Index source: {}", state.session.loader().source().describe());

    let app = api::router(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
