//! Plugin action links for `/ap` and `/dp` / 插件启用与停用链接

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::{PaletteError, PaletteResult};
use crate::models::{Caller, Plugin, CAP_ACTIVATE_PLUGINS};
use crate::nonce::NonceSigner;
use crate::search::{ResultItem, ResultSet};

pub const PLUGIN_TYPE: &str = "plugin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginAction {
    Activate,
    Deactivate,
}

impl PluginAction {
    /// Exact match on the trimmed command / 精确匹配命令
    pub fn from_command(command: &str) -> Option<Self> {
        match command.trim() {
            "/ap" => Some(PluginAction::Activate),
            "/dp" => Some(PluginAction::Deactivate),
            _ => None,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            PluginAction::Activate => "activate",
            PluginAction::Deactivate => "deactivate",
        }
    }

    /// Activation lists inactive plugins, deactivation lists active ones
    fn applies_to(&self, plugin: &Plugin) -> bool {
        match self {
            PluginAction::Activate => !plugin.active,
            PluginAction::Deactivate => plugin.active,
        }
    }

    /// Nonce action name for one plugin / 随机数动作名
    pub fn nonce_action(&self, file: &str) -> String {
        format!("{}-plugin_{}", self.verb(), file)
    }
}

/// Installed plugin registry / 已安装插件
#[async_trait]
pub trait PluginStore: Send + Sync {
    /// Every installed plugin, ordered by name
    async fn installed(&self) -> PaletteResult<Vec<Plugin>>;
}

pub struct SqlitePluginStore {
    db: SqlitePool,
}

impl SqlitePluginStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PluginStore for SqlitePluginStore {
    async fn installed(&self) -> PaletteResult<Vec<Plugin>> {
        let plugins = sqlx::query_as::<_, Plugin>(
            "SELECT file, name, active FROM plugins ORDER BY name COLLATE NOCASE, file",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(plugins)
    }
}

/// Action handler / 动作处理器
pub struct PluginLinks {
    store: Arc<dyn PluginStore>,
    nonces: NonceSigner,
    admin_base: String,
}

impl PluginLinks {
    pub fn new(store: Arc<dyn PluginStore>, nonces: NonceSigner, admin_base: impl Into<String>) -> Self {
        Self {
            store,
            nonces,
            admin_base: admin_base.into(),
        }
    }

    /// One nonce-protected link per plugin the action applies to / 生成插件操作链接
    pub async fn list_plugin_links(&self, action: PluginAction, caller: &Caller) -> PaletteResult<ResultSet> {
        if !caller.can(CAP_ACTIVATE_PLUGINS) {
            return Err(PaletteError::UnauthorizedAction(CAP_ACTIVATE_PLUGINS));
        }

        let session = caller.session_token.as_deref().unwrap_or_default();
        let items = self
            .store
            .installed()
            .await?
            .into_iter()
            .filter(|plugin| action.applies_to(plugin))
            .map(|plugin| {
                let nonce = self.nonces.create(&action.nonce_action(&plugin.file), session);
                let url = format!(
                    "{}plugins.php?action={}&plugin={}&plugin_status=all&paged=1&s=&_wpnonce={}",
                    self.admin_base,
                    action.verb(),
                    urlencoding::encode(&plugin.file),
                    nonce
                );
                ResultItem::new(plugin.name, PLUGIN_TYPE, "", url)
            })
            .collect();

        Ok(ResultSet::from_items(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fixtures, memory_pool};
    use crate::utils::query_param;

    fn admin() -> Caller {
        Caller {
            user_id: Some(1),
            session_token: Some("sess".to_string()),
            capabilities: vec![CAP_ACTIVATE_PLUGINS.to_string()],
        }
    }

    async fn links() -> (PluginLinks, NonceSigner) {
        let pool = memory_pool().await;
        fixtures::insert_plugin(&pool, "hello.php", "Hello Dolly", false).await;
        fixtures::insert_plugin(&pool, "akismet/akismet.php", "Akismet Anti-Spam", true).await;
        fixtures::insert_plugin(&pool, "classic-editor/classic-editor.php", "Classic Editor", false).await;

        let nonces = NonceSigner::new("secret", 86400);
        let store = Arc::new(SqlitePluginStore::new(pool));
        (PluginLinks::new(store, nonces.clone(), "/wp-admin/"), nonces)
    }

    #[test]
    fn test_from_command() {
        assert_eq!(PluginAction::from_command(" /ap "), Some(PluginAction::Activate));
        assert_eq!(PluginAction::from_command("/dp"), Some(PluginAction::Deactivate));
        assert_eq!(PluginAction::from_command("/apx"), None);
        assert_eq!(PluginAction::from_command("/ap now"), None);
    }

    #[tokio::test]
    async fn test_activate_lists_inactive_plugins() {
        let (links, nonces) = links().await;
        let set = links.list_plugin_links(PluginAction::Activate, &admin()).await.unwrap();

        let titles: Vec<&str> = set.results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Classic Editor", "Hello Dolly"]);
        assert_eq!(set.count, 2);

        let item = &set.results[1];
        assert_eq!(item.object_type, PLUGIN_TYPE);
        assert_eq!(item.subtitle, "");
        assert!(item.url.starts_with(
            "/wp-admin/plugins.php?action=activate&plugin=hello.php&plugin_status=all&paged=1&s=&_wpnonce="
        ));
        let nonce = query_param(&item.url, "_wpnonce").unwrap();
        assert!(nonces.verify(nonce, "activate-plugin_hello.php", "sess"));
    }

    #[tokio::test]
    async fn test_deactivate_lists_active_plugins() {
        let (links, _) = links().await;
        let set = links.list_plugin_links(PluginAction::Deactivate, &admin()).await.unwrap();
        assert_eq!(set.count, 1);
        assert_eq!(set.results[0].title, "Akismet Anti-Spam");
        assert!(set.results[0].url.contains("action=deactivate&plugin=akismet%2Fakismet.php&"));
    }

    #[tokio::test]
    async fn test_requires_capability() {
        let (links, _) = links().await;
        let err = links
            .list_plugin_links(PluginAction::Activate, &Caller::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, PaletteError::UnauthorizedAction(CAP_ACTIVATE_PLUGINS)));
    }
}
