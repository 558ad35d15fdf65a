//! Admin menu snapshot - built from the raw menu, cached with a TTL / 后台菜单快照
//!
//! Follow architecture principles / 遵循架构原则：
//! - The snapshot is populated and invalidated from outside the search path
//! - Searches only read it through `AdminMenuCache::pages`
//! - No process-wide globals: the cache is constructed once and injected

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::utils::{clean_menu_title, query_param, ucfirst};

/// Class carried by menu separators / 菜单分隔符的 class
const SEPARATOR_CLASS: &str = "wp-menu-separator";

/// Submenu slugs already reachable from the top level / 已在顶层出现的子菜单
const SKIPPED_SUBMENU_URLS: [&str; 2] = ["index.php", "upload.php"];

/// Nouns appended to generic "Add New" entries / "Add New" 条目补充的名词
const ADD_NEW_NOUNS: [(&str, &str); 4] = [
    ("post-new.php", "Post"),
    ("media-new.php", "Attachment"),
    ("plugin-install.php", "Plugin"),
    ("user-new.php", "User"),
];

/// One searchable admin page / 后台页面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPage {
    pub title: String,
    pub url: String,
}

/// Top-level menu entry as registered by the admin panel / 顶层菜单项
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItem {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub classes: String,
}

/// Submenu entry / 子菜单项
#[derive(Debug, Clone, Deserialize)]
pub struct SubmenuItem {
    pub title: String,
    pub slug: String,
}

/// Submenu entries grouped under their parent slug / 按父级分组的子菜单
#[derive(Debug, Clone, Deserialize)]
pub struct SubmenuGroup {
    pub parent: String,
    pub items: Vec<SubmenuItem>,
}

/// Raw admin menu as published by the panel / 原始后台菜单
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAdminMenu {
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub submenu: Vec<SubmenuGroup>,
}

/// Build the searchable page list / 构建可搜索的页面列表
pub fn build_admin_pages(raw: &RawAdminMenu) -> Vec<AdminPage> {
    let mut pages = Vec::new();

    for item in &raw.menu {
        if item.classes.split_whitespace().any(|c| c == SEPARATOR_CLASS) {
            continue;
        }
        pages.push(AdminPage {
            title: clean_menu_title(&item.title),
            url: item.slug.clone(),
        });
    }

    for group in &raw.submenu {
        for item in &group.items {
            if let Some(page) = build_submenu_page(&group.parent, item) {
                pages.push(page);
            }
        }
    }

    pages
}

fn build_submenu_page(parent: &str, item: &SubmenuItem) -> Option<AdminPage> {
    // Plugin pages register a bare slug, served through the parent screen
    let url = if item.slug.contains(".php") {
        item.slug.clone()
    } else {
        format!("{}?page={}", parent, item.slug)
    };

    if SKIPPED_SUBMENU_URLS.contains(&url.as_str()) {
        return None;
    }

    let mut title = clean_menu_title(&item.title);

    if title.contains("Add") {
        if let Some(post_type) = query_param(&url, "post_type") {
            title.push(' ');
            title.push_str(&ucfirst(post_type));
        }
    }

    if let Some((_, noun)) = ADD_NEW_NOUNS.iter().find(|(slug, _)| *slug == url) {
        title.push(' ');
        title.push_str(noun);
    }

    Some(AdminPage { title, url })
}

struct Snapshot {
    pages: Arc<Vec<AdminPage>>,
    stored_at: Instant,
}

/// Cache status for diagnostics / 缓存状态
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub present: bool,
    pub expired: bool,
    pub entries: usize,
    pub age_secs: Option<u64>,
}

/// TTL-boxed admin menu snapshot / 带有效期的后台菜单快照
pub struct AdminMenuCache {
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl AdminMenuCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// Replace the snapshot / 替换快照
    pub fn store(&self, pages: Vec<AdminPage>) {
        let count = pages.len();
        *self.snapshot.write() = Some(Snapshot {
            pages: Arc::new(pages),
            stored_at: Instant::now(),
        });
        tracing::info!("Admin menu snapshot stored: {} pages", count);
    }

    /// Build and store from a raw menu / 从原始菜单构建并存储
    pub fn populate(&self, raw: &RawAdminMenu) -> usize {
        let pages = build_admin_pages(raw);
        let count = pages.len();
        self.store(pages);
        count
    }

    /// Drop the snapshot (plugin or theme switched) / 清除快照
    pub fn invalidate(&self) {
        *self.snapshot.write() = None;
        tracing::info!("Admin menu snapshot invalidated");
    }

    /// Current pages, `None` when missing or expired / 当前页面列表，缺失或过期时为 None
    pub fn pages(&self) -> Option<Arc<Vec<AdminPage>>> {
        let guard = self.snapshot.read();
        let snapshot = guard.as_ref()?;
        if snapshot.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(snapshot.pages.clone())
    }

    pub fn status(&self) -> CacheStatus {
        let guard = self.snapshot.read();
        match guard.as_ref() {
            Some(snapshot) => {
                let age = snapshot.stored_at.elapsed();
                CacheStatus {
                    present: true,
                    expired: age >= self.ttl,
                    entries: snapshot.pages.len(),
                    age_secs: Some(age.as_secs()),
                }
            }
            None => CacheStatus {
                present: false,
                expired: false,
                entries: 0,
                age_secs: None,
            },
        }
    }
}
