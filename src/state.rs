use std::sync::Arc;

use sqlx::SqlitePool;

use acp_backend::admin_menu::AdminMenuCache;
use acp_backend::config::AppConfig;
use acp_backend::nonce::NonceSigner;
use acp_backend::palette::CommandPalette;
use acp_backend::plugins::{PluginLinks, SqlitePluginStore};
use acp_backend::search::SearchEngine;
use acp_backend::sources::{AdminPageSource, PostSource, SearchSource, TermSource, UserSource};

/// Shared application state / 共享应用状态
pub struct AppState {
    pub db: SqlitePool,
    pub config: AppConfig,
    pub palette: CommandPalette,
    pub admin_menu: Arc<AdminMenuCache>,
}

impl AppState {
    /// Wire sources, engine and action handler explicitly / 显式组装各组件
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        let admin_base = config.admin.base_url.clone();
        let admin_menu = Arc::new(AdminMenuCache::new(config.admin_menu.ttl()));

        let sources: Vec<Arc<dyn SearchSource>> = vec![
            Arc::new(PostSource::new(db.clone(), admin_base.clone(), config.search.included_post_types.clone())),
            Arc::new(TermSource::new(db.clone(), admin_base.clone(), config.search.included_taxonomies.clone())),
            Arc::new(UserSource::new(db.clone(), admin_base.clone())),
            Arc::new(AdminPageSource::new(admin_menu.clone(), admin_base.clone())),
        ];
        let engine = SearchEngine::new(sources, config.search.results_max, config.search.source_timeout());

        let nonces = NonceSigner::new(config.admin.nonce_secret.clone(), config.admin.nonce_lifetime_secs);
        let plugins = PluginLinks::new(Arc::new(SqlitePluginStore::new(db.clone())), nonces, admin_base);

        Self {
            db,
            config,
            palette: CommandPalette::new(engine, plugins),
            admin_menu,
        }
    }
}
