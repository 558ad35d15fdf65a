//! Documents source - posts of every searchable post type / 文章数据源

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{like_pattern, placeholders, sql_limit, SearchSource, SourceHits, SourceKind};
use crate::error::PaletteResult;
use crate::models::{Post, PostType};
use crate::search::ResultItem;

/// Statuses never offered by the palette / 不参与搜索的状态
const HIDDEN_STATUSES: [&str; 2] = ["trash", "auto-draft"];

/// Guard against parent cycles in broken data / 防止父级循环
const MAX_ANCESTOR_DEPTH: usize = 64;

pub struct PostSource {
    db: SqlitePool,
    admin_base: String,
    /// Configured default post types, empty means all public ones / 默认文章类型
    included_post_types: Vec<String>,
}

impl PostSource {
    pub fn new(db: SqlitePool, admin_base: impl Into<String>, included_post_types: Vec<String>) -> Self {
        Self {
            db,
            admin_base: admin_base.into(),
            included_post_types,
        }
    }

    /// Post types searched when the query names none / 默认搜索的文章类型
    pub async fn searchable_post_types(&self) -> PaletteResult<Vec<String>> {
        searchable_post_types(&self.db, &self.included_post_types).await
    }

    fn edit_url(&self, id: i64) -> String {
        format!("{}post.php?post={}&action=edit", self.admin_base, id)
    }

    async fn hierarchical_types(&self) -> PaletteResult<HashSet<String>> {
        let post_types = sqlx::query_as::<_, PostType>(
            "SELECT name, label, public, hierarchical FROM post_types WHERE hierarchical = 1",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(post_types.into_iter().map(|t| t.name).collect())
    }

    /// Ancestor subtitle: ` | Root / Child`, empty without ancestors / 祖先路径副标题
    async fn hierarchical_subtitle(&self, parent_id: Option<i64>) -> PaletteResult<String> {
        let mut titles: Vec<String> = Vec::new();
        let mut seen: HashSet<i64> = HashSet::new();
        let mut next = parent_id.filter(|id| *id > 0);

        while let Some(id) = next {
            if !seen.insert(id) || seen.len() > MAX_ANCESTOR_DEPTH {
                tracing::warn!("Post ancestor chain broken at post {}", id);
                break;
            }
            let row: Option<(String, Option<i64>)> =
                sqlx::query_as("SELECT title, parent_id FROM posts WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&self.db)
                    .await?;
            match row {
                Some((title, parent)) => {
                    titles.push(title);
                    next = parent.filter(|id| *id > 0);
                }
                None => break,
            }
        }

        if titles.is_empty() {
            return Ok(String::new());
        }
        titles.reverse();
        Ok(format!(" | {}", titles.join(" / ")))
    }
}

/// Public post types, narrowed to the configured list when it is non-empty / 可搜索的文章类型
pub async fn searchable_post_types(db: &SqlitePool, included: &[String]) -> PaletteResult<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM post_types WHERE public = 1 ORDER BY rowid")
        .fetch_all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(name,)| name)
        .filter(|name| included.is_empty() || included.contains(name))
        .collect())
}

#[async_trait]
impl SearchSource for PostSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Documents
    }

    async fn find(&self, keyword: &str, scope: &[String], limit: usize) -> PaletteResult<SourceHits> {
        let post_types = if scope.is_empty() {
            self.searchable_post_types().await?
        } else {
            scope.to_vec()
        };
        if post_types.is_empty() {
            return Ok(SourceHits::default());
        }

        let pattern = like_pattern(keyword);
        let filter = format!(
            "post_type IN ({}) AND status NOT IN ({}) AND title LIKE ? ESCAPE '\\'",
            placeholders(post_types.len()),
            placeholders(HIDDEN_STATUSES.len()),
        );

        let count_sql = format!("SELECT COUNT(*) FROM posts WHERE {}", filter);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for post_type in &post_types {
            count_query = count_query.bind(post_type);
        }
        for status in HIDDEN_STATUSES {
            count_query = count_query.bind(status);
        }
        let (total,) = count_query.bind(&pattern).fetch_one(&self.db).await?;

        let rows_sql = format!(
            "SELECT id, title, post_type, parent_id, status, created_at FROM posts WHERE {} ORDER BY created_at DESC, id DESC LIMIT ?",
            filter
        );
        let mut rows_query = sqlx::query_as::<_, Post>(&rows_sql);
        for post_type in &post_types {
            rows_query = rows_query.bind(post_type);
        }
        for status in HIDDEN_STATUSES {
            rows_query = rows_query.bind(status);
        }
        let rows = rows_query
            .bind(&pattern)
            .bind(sql_limit(limit))
            .fetch_all(&self.db)
            .await?;

        let hierarchical = if rows.is_empty() {
            HashSet::new()
        } else {
            self.hierarchical_types().await?
        };

        let mut items = Vec::with_capacity(rows.len());
        for post in rows {
            let subtitle = if hierarchical.contains(&post.post_type) {
                self.hierarchical_subtitle(post.parent_id).await?
            } else {
                String::new()
            };
            let url = self.edit_url(post.id);
            items.push(ResultItem::new(post.title, post.post_type, subtitle, url));
        }

        Ok(SourceHits::new(items, total.max(0) as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fixtures, memory_pool};

    #[tokio::test]
    async fn test_find_matches_title_case_insensitive() {
        let pool = memory_pool().await;
        fixtures::insert_post(&pool, "Hello World", "post", None).await;
        fixtures::insert_post(&pool, "Goodbye", "post", None).await;

        let source = PostSource::new(pool, "/wp-admin/", Vec::new());
        let hits = source.find("hello", &[], 10).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items.len(), 1);
        assert_eq!(hits.items[0].title, "Hello World");
        assert_eq!(hits.items[0].object_type, "post");
        assert_eq!(hits.items[0].subtitle, "");
        assert!(hits.items[0].url.starts_with("/wp-admin/post.php?post="));
        assert!(hits.items[0].url.ends_with("&action=edit"));
    }

    #[tokio::test]
    async fn test_total_exceeds_limit() {
        let pool = memory_pool().await;
        for i in 0..15 {
            fixtures::insert_post(&pool, &format!("Pirate {}", i), "post", None).await;
        }
        let source = PostSource::new(pool, "/wp-admin/", Vec::new());
        let hits = source.find("pirate", &[], 10).await.unwrap();
        assert_eq!(hits.items.len(), 10);
        assert_eq!(hits.total, 15);
    }

    #[tokio::test]
    async fn test_scope_restricts_post_types() {
        let pool = memory_pool().await;
        fixtures::insert_post(&pool, "Pirates post", "post", None).await;
        fixtures::insert_post(&pool, "Pirates page", "page", None).await;

        let source = PostSource::new(pool, "/wp-admin/", Vec::new());
        let hits = source.find("pirates", &["page".to_string()], 10).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].object_type, "page");
    }

    #[tokio::test]
    async fn test_included_post_types_narrow_defaults() {
        let pool = memory_pool().await;
        fixtures::insert_post(&pool, "Pirates post", "post", None).await;
        fixtures::insert_post(&pool, "Pirates page", "page", None).await;

        let source = PostSource::new(pool, "/wp-admin/", vec!["post".to_string()]);
        assert_eq!(source.searchable_post_types().await.unwrap(), vec!["post"]);
        let hits = source.find("pirates", &[], 10).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].object_type, "post");
    }

    #[tokio::test]
    async fn test_hierarchical_subtitle() {
        let pool = memory_pool().await;
        let root = fixtures::insert_post(&pool, "Company", "page", None).await;
        let mid = fixtures::insert_post(&pool, "Team", "page", Some(root)).await;
        fixtures::insert_post(&pool, "Leadership", "page", Some(mid)).await;

        let source = PostSource::new(pool, "/wp-admin/", Vec::new());
        let hits = source.find("Leadership", &[], 10).await.unwrap();
        assert_eq!(hits.items[0].subtitle, " | Company / Team");

        let hits = source.find("Company", &[], 10).await.unwrap();
        assert_eq!(hits.items[0].subtitle, "");
    }

    #[tokio::test]
    async fn test_non_hierarchical_has_no_subtitle() {
        let pool = memory_pool().await;
        let parent = fixtures::insert_post(&pool, "Parent", "post", None).await;
        fixtures::insert_post(&pool, "Child", "post", Some(parent)).await;

        let source = PostSource::new(pool, "/wp-admin/", Vec::new());
        let hits = source.find("Child", &[], 10).await.unwrap();
        assert_eq!(hits.items[0].subtitle, "");
    }

    #[tokio::test]
    async fn test_trash_and_wildcards_excluded() {
        let pool = memory_pool().await;
        let id = fixtures::insert_post(&pool, "Old news", "post", None).await;
        sqlx::query("UPDATE posts SET status = 'trash' WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();
        fixtures::insert_post(&pool, "100% done", "post", None).await;
        fixtures::insert_post(&pool, "1000 done", "post", None).await;

        let source = PostSource::new(pool, "/wp-admin/", Vec::new());
        assert_eq!(source.find("news", &[], 10).await.unwrap().total, 0);
        let hits = source.find("0%", &[], 10).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].title, "100% done");
    }
}
