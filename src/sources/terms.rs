//! Taxonomy terms source / 分类项数据源

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{like_pattern, placeholders, sql_limit, SearchSource, SourceHits, SourceKind};
use crate::error::PaletteResult;
use crate::models::{Taxonomy, Term};
use crate::search::ResultItem;

pub struct TermSource {
    db: SqlitePool,
    admin_base: String,
    /// Configured default taxonomies, empty means all public ones / 默认分类法
    included_taxonomies: Vec<String>,
}

impl TermSource {
    pub fn new(db: SqlitePool, admin_base: impl Into<String>, included_taxonomies: Vec<String>) -> Self {
        Self {
            db,
            admin_base: admin_base.into(),
            included_taxonomies,
        }
    }

    async fn taxonomies(&self) -> PaletteResult<Vec<Taxonomy>> {
        let taxonomies = sqlx::query_as::<_, Taxonomy>(
            "SELECT name, label, public, object_type FROM taxonomies ORDER BY rowid",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(taxonomies)
    }

    /// Public taxonomies, narrowed to the configured list / 默认搜索的分类法
    fn default_taxonomies(&self, taxonomies: &[Taxonomy]) -> Vec<String> {
        taxonomies
            .iter()
            .filter(|t| t.public)
            .filter(|t| self.included_taxonomies.is_empty() || self.included_taxonomies.contains(&t.name))
            .map(|t| t.name.clone())
            .collect()
    }

    fn edit_url(&self, id: i64, taxonomy: &str, object_type: Option<&str>) -> String {
        let mut url = format!(
            "{}term.php?taxonomy={}&tag_ID={}",
            self.admin_base,
            urlencoding::encode(taxonomy),
            id
        );
        if let Some(object_type) = object_type {
            url.push_str("&post_type=");
            url.push_str(&urlencoding::encode(object_type));
        }
        url
    }
}

#[async_trait]
impl SearchSource for TermSource {
    fn kind(&self) -> SourceKind {
        SourceKind::TaxonomyTerms
    }

    async fn find(&self, keyword: &str, scope: &[String], limit: usize) -> PaletteResult<SourceHits> {
        let registered = self.taxonomies().await?;
        let taxonomies = if scope.is_empty() {
            self.default_taxonomies(&registered)
        } else {
            scope.to_vec()
        };
        if taxonomies.is_empty() {
            return Ok(SourceHits::default());
        }

        let pattern = like_pattern(keyword);
        let filter = format!(
            "taxonomy IN ({}) AND name LIKE ? ESCAPE '\\'",
            placeholders(taxonomies.len())
        );

        let count_sql = format!("SELECT COUNT(*) FROM terms WHERE {}", filter);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for taxonomy in &taxonomies {
            count_query = count_query.bind(taxonomy);
        }
        let (total,) = count_query.bind(&pattern).fetch_one(&self.db).await?;

        let rows_sql = format!(
            "SELECT id, name, taxonomy FROM terms WHERE {} ORDER BY name COLLATE NOCASE, id LIMIT ?",
            filter
        );
        let mut rows_query = sqlx::query_as::<_, Term>(&rows_sql);
        for taxonomy in &taxonomies {
            rows_query = rows_query.bind(taxonomy);
        }
        let rows = rows_query
            .bind(&pattern)
            .bind(sql_limit(limit))
            .fetch_all(&self.db)
            .await?;

        // First object type of each taxonomy, used as the `post_type` link param
        let object_types: HashMap<&str, &str> = registered
            .iter()
            .filter_map(|t| {
                let object_type = t.object_type.as_deref().filter(|o| !o.is_empty())?;
                Some((t.name.as_str(), object_type))
            })
            .collect();
        let items = rows
            .into_iter()
            .map(|term| {
                let url = self.edit_url(term.id, &term.taxonomy, object_types.get(term.taxonomy.as_str()).copied());
                ResultItem::new(term.name, term.taxonomy, "", url)
            })
            .collect();

        Ok(SourceHits::new(items, total.max(0) as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fixtures, memory_pool};

    #[tokio::test]
    async fn test_find_in_public_taxonomies() {
        let pool = memory_pool().await;
        let id = fixtures::insert_term(&pool, "News", "category").await;
        fixtures::insert_term(&pool, "newsletter", "post_tag").await;
        fixtures::insert_term(&pool, "Sports", "category").await;

        let source = TermSource::new(pool, "/wp-admin/", Vec::new());
        let hits = source.find("news", &[], 10).await.unwrap();
        assert_eq!(hits.total, 2);
        assert_eq!(hits.items[0].title, "News");
        assert_eq!(hits.items[0].object_type, "category");
        assert_eq!(
            hits.items[0].url,
            format!("/wp-admin/term.php?taxonomy=category&tag_ID={}&post_type=post", id)
        );
        assert_eq!(hits.items[1].object_type, "post_tag");
    }

    #[tokio::test]
    async fn test_scope_restricts_taxonomies() {
        let pool = memory_pool().await;
        fixtures::insert_term(&pool, "News", "category").await;
        fixtures::insert_term(&pool, "newsletter", "post_tag").await;

        let source = TermSource::new(pool, "/wp-admin/", Vec::new());
        let hits = source.find("news", &["post_tag".to_string()], 10).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].title, "newsletter");
    }

    #[tokio::test]
    async fn test_private_taxonomy_needs_explicit_scope() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO taxonomies (name, label, public, object_type) VALUES ('nav_menu', 'Menus', 0, NULL)")
            .execute(&pool)
            .await
            .unwrap();
        let id = fixtures::insert_term(&pool, "Main menu", "nav_menu").await;

        let source = TermSource::new(pool, "/wp-admin/", Vec::new());
        assert_eq!(source.find("menu", &[], 10).await.unwrap().total, 0);

        let hits = source.find("menu", &["nav_menu".to_string()], 10).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].url, format!("/wp-admin/term.php?taxonomy=nav_menu&tag_ID={}", id));
    }

    #[tokio::test]
    async fn test_included_taxonomies() {
        let pool = memory_pool().await;
        fixtures::insert_term(&pool, "News", "category").await;
        fixtures::insert_term(&pool, "newsletter", "post_tag").await;

        let source = TermSource::new(pool, "/wp-admin/", vec!["post_tag".to_string()]);
        let hits = source.find("news", &[], 10).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].object_type, "post_tag");
    }
}
