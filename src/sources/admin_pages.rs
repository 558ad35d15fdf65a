//! Admin pages source - reads the injected menu snapshot / 后台页面数据源

use std::sync::Arc;

use async_trait::async_trait;

use super::{SearchSource, SourceHits, SourceKind};
use crate::admin_menu::AdminMenuCache;
use crate::error::PaletteResult;
use crate::search::ResultItem;
use crate::utils::contains_ignore_case;

pub const ADMIN_PAGE_TYPE: &str = "Admin Page";

pub struct AdminPageSource {
    cache: Arc<AdminMenuCache>,
    admin_base: String,
}

impl AdminPageSource {
    pub fn new(cache: Arc<AdminMenuCache>, admin_base: impl Into<String>) -> Self {
        Self {
            cache,
            admin_base: admin_base.into(),
        }
    }

    /// Menu slugs are relative to the admin base unless they carry a scheme / 页面链接
    fn page_url(&self, slug: &str) -> String {
        if slug.contains("://") {
            slug.to_string()
        } else {
            format!("{}{}", self.admin_base, slug)
        }
    }
}

#[async_trait]
impl SearchSource for AdminPageSource {
    fn kind(&self) -> SourceKind {
        SourceKind::AdminPages
    }

    /// Substring match on titles. The snapshot is small and in memory, so
    /// every match is returned and `limit` is not applied; an empty keyword
    /// lists every page.
    async fn find(&self, keyword: &str, _scope: &[String], _limit: usize) -> PaletteResult<SourceHits> {
        let Some(pages) = self.cache.pages() else {
            tracing::debug!("Admin menu snapshot missing or expired");
            return Ok(SourceHits::default());
        };

        let items: Vec<ResultItem> = pages
            .iter()
            .filter(|page| keyword.is_empty() || contains_ignore_case(&page.title, keyword))
            .map(|page| {
                ResultItem::new(
                    page.title.clone(),
                    ADMIN_PAGE_TYPE,
                    "",
                    self.page_url(&page.url),
                )
            })
            .collect();

        let total = items.len();
        Ok(SourceHits::new(items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin_menu::AdminPage;
    use std::time::Duration;

    fn cache_with(pages: &[(&str, &str)]) -> Arc<AdminMenuCache> {
        let cache = Arc::new(AdminMenuCache::new(Duration::from_secs(60)));
        cache.store(
            pages
                .iter()
                .map(|(title, url)| AdminPage { title: title.to_string(), url: url.to_string() })
                .collect(),
        );
        cache
    }

    #[tokio::test]
    async fn test_case_insensitive_substring() {
        let cache = cache_with(&[
            ("General Settings", "options-general.php"),
            ("Reading", "options-reading.php"),
            ("Settings", "options.php"),
        ]);
        let source = AdminPageSource::new(cache, "/wp-admin/");
        let hits = source.find("SETTINGS", &[], 10).await.unwrap();
        assert_eq!(hits.total, 2);
        assert_eq!(hits.items[0].title, "General Settings");
        assert_eq!(hits.items[0].object_type, ADMIN_PAGE_TYPE);
        assert_eq!(hits.items[0].url, "/wp-admin/options-general.php");
    }

    #[tokio::test]
    async fn test_empty_keyword_lists_everything() {
        let pages: Vec<(String, String)> = (0..15).map(|i| (format!("Page {}", i), format!("p{}.php", i))).collect();
        let refs: Vec<(&str, &str)> = pages.iter().map(|(t, u)| (t.as_str(), u.as_str())).collect();
        let source = AdminPageSource::new(cache_with(&refs), "/wp-admin/");
        let hits = source.find("", &[], 10).await.unwrap();
        assert_eq!(hits.items.len(), 15);
        assert_eq!(hits.total, 15);
    }

    #[tokio::test]
    async fn test_absolute_menu_links_are_kept() {
        let cache = cache_with(&[
            ("Docs", "https://example.com/docs"),
            ("Tools", "tools.php"),
        ]);
        let source = AdminPageSource::new(cache, "/wp-admin/");
        let hits = source.find("", &[], 10).await.unwrap();
        assert_eq!(hits.items[0].url, "https://example.com/docs");
        assert_eq!(hits.items[1].url, "/wp-admin/tools.php");
    }

    #[tokio::test]
    async fn test_missing_snapshot_yields_nothing() {
        let cache = Arc::new(AdminMenuCache::new(Duration::from_secs(60)));
        let source = AdminPageSource::new(cache, "/wp-admin/");
        let hits = source.find("settings", &[], 10).await.unwrap();
        assert!(hits.items.is_empty());
        assert_eq!(hits.total, 0);
    }
}
