use std::sync::Arc;

use site_search::config::AppConfig;
use site_search::content::{ContentMaterializer, HttpContentMaterializer};
use site_search::source::source_from_config;
use site_search::{IndexLoader, SearchSession};

/// Shared server state / 服务器共享状态
pub struct AppState {
    pub config: AppConfig,
    /// The single search session served by this process / 当前进程的搜索会话
    pub session: SearchSession,
    pub materializer: Arc<dyn ContentMaterializer>,
}

impl AppState {
    /// Build state from config, the index itself is loaded lazily / 根据配置构建（索引懒加载）
    pub fn from_config(config: AppConfig) -> site_search::Result<Self> {
        let loader = IndexLoader::new(source_from_config(&config)?);
        let session = SearchSession::new(loader, config.page_size());
        let materializer = Arc::new(HttpContentMaterializer::new(
            config.site_url()?,
            config.request_timeout(),
        )?);

        Ok(Self {
            config,
            session,
            materializer,
        })
    }
}
