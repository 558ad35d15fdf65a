//! Users source / 用户数据源

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{like_pattern, sql_limit, SearchSource, SourceHits, SourceKind};
use crate::error::PaletteResult;
use crate::models::User;
use crate::search::ResultItem;

pub struct UserSource {
    db: SqlitePool,
    admin_base: String,
}

impl UserSource {
    pub fn new(db: SqlitePool, admin_base: impl Into<String>) -> Self {
        Self {
            db,
            admin_base: admin_base.into(),
        }
    }
}

#[async_trait]
impl SearchSource for UserSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Users
    }

    async fn find(&self, keyword: &str, _scope: &[String], limit: usize) -> PaletteResult<SourceHits> {
        let pattern = like_pattern(keyword);

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE display_name LIKE ? ESCAPE '\\'")
                .bind(&pattern)
                .fetch_one(&self.db)
                .await?;

        let users = sqlx::query_as::<_, User>(
            "SELECT id, user_login, display_name, capabilities, created_at FROM users WHERE display_name LIKE ? ESCAPE '\\' ORDER BY display_name COLLATE NOCASE, id LIMIT ?",
        )
        .bind(&pattern)
        .bind(sql_limit(limit))
        .fetch_all(&self.db)
        .await?;

        let items = users
            .into_iter()
            .map(|user| {
                let url = format!("{}user-edit.php?user_id={}", self.admin_base, user.id);
                ResultItem::new(user.display_name, "user", "", url)
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
    async fn test_find_by_display_name() {
        let pool = memory_pool().await;
        let id = fixtures::insert_user(&pool, "steve", "Steve Rogers", "").await;
        fixtures::insert_user(&pool, "tony", "Tony Stark", "").await;

        let source = UserSource::new(pool, "/wp-admin/");
        let hits = source.find("steve", &[], 10).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0], ResultItem::new(
            "Steve Rogers",
            "user",
            "",
            format!("/wp-admin/user-edit.php?user_id={}", id),
        ));
    }

    #[tokio::test]
    async fn test_empty_keyword_lists_first_page() {
        let pool = memory_pool().await;
        for i in 0..12 {
            fixtures::insert_user(&pool, &format!("user{}", i), &format!("User {:02}", i), "").await;
        }
        let source = UserSource::new(pool, "/wp-admin/");
        let hits = source.find("", &[], 10).await.unwrap();
        assert_eq!(hits.items.len(), 10);
        assert_eq!(hits.total, 12);
        assert_eq!(hits.items[0].title, "User 00");
    }
}
