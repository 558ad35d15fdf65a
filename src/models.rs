use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostType {
    pub name: String,
    pub label: String,
    pub public: bool,
    pub hierarchical: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub post_type: String,
    pub parent_id: Option<i64>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Taxonomy {
    pub name: String,
    pub label: String,
    pub public: bool,
    /// First post type the taxonomy is attached to / 关联的第一个文章类型
    pub object_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Term {
    pub id: i64,
    pub name: String,
    pub taxonomy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub user_login: String,
    pub display_name: String,
    /// Comma separated capability names / 逗号分隔的权限名
    pub capabilities: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Plugin {
    /// Plugin main file relative to the plugins dir, e.g. `akismet/akismet.php`
    pub file: String,
    pub name: String,
    pub active: bool,
}

/// Capability required for `/ap` and `/dp` / 插件管理权限
pub const CAP_ACTIVATE_PLUGINS: &str = "activate_plugins";
/// Capability required to publish or drop the admin menu snapshot / 管理选项权限
pub const CAP_MANAGE_OPTIONS: &str = "manage_options";

/// The caller of one request / 当前请求的调用者
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user_id: Option<i64>,
    pub session_token: Option<String>,
    pub capabilities: Vec<String>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn can(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

/// Parse the stored capability list / 解析权限列表
pub fn parse_capabilities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .collect()
}
