use std::sync::Arc;

use sqlx::sqlite::SqlitePool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod state;

use acp_backend::admin_menu::RawAdminMenu;
use acp_backend::{config, db};
use state::AppState;

/// Seed the admin menu snapshot from a JSON file / 从文件加载后台菜单快照
fn seed_admin_menu(state: &AppState) {
    let Some(path) = state.config.get_admin_menu_seed() else {
        return;
    };

    let raw = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<RawAdminMenu>(&content).map_err(|e| e.to_string()));

    match raw {
        Ok(raw) => {
            let entries = state.admin_menu.populate(&raw);
            tracing::info!("Admin menu seeded from {:?}: {} entries", path, entries);
        }
        Err(e) => tracing::warn!("Failed to seed admin menu from {:?}: {}", path, e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "acp_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::load_config().map_err(anyhow::Error::msg)?;
    tracing::info!("Server will listen on {}:{}", app_config.server.host, app_config.server.port);

    // Create data directory if not exists / 创建数据目录
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| app_config.get_database_url());

    let pool = SqlitePool::connect(&database_url).await?;

    db::run_migrations(&pool).await?;

    let bind_addr = app_config.get_bind_address();
    let state = Arc::new(AppState::new(pool, app_config));
    seed_admin_menu(&state);

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
