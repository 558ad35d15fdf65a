use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Built-in post types: (name, label, public, hierarchical) / 内置文章类型
const BUILTIN_POST_TYPES: [(&str, &str, bool, bool); 3] = [
    ("post", "Posts", true, false),
    ("page", "Pages", true, true),
    ("attachment", "Media", true, false),
];

/// Built-in taxonomies: (name, label, public, object_type) / 内置分类法
const BUILTIN_TAXONOMIES: [(&str, &str, bool, &str); 2] = [
    ("category", "Categories", true, "post"),
    ("post_tag", "Tags", true, "post"),
];

/// Run database migrations / 运行数据库迁移
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS post_types (
            name TEXT PRIMARY KEY,
            label TEXT NOT NULL,
            public INTEGER NOT NULL DEFAULT 1,
            hierarchical INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            post_type TEXT NOT NULL,
            parent_id INTEGER,
            status TEXT NOT NULL DEFAULT 'publish',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_type ON posts(post_type)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS taxonomies (
            name TEXT PRIMARY KEY,
            label TEXT NOT NULL,
            public INTEGER NOT NULL DEFAULT 1,
            object_type TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS terms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            taxonomy TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_login TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            capabilities TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            expires_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plugins (
            file TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Insert built-in content types if absent / 插入内置内容类型
    for (name, label, public, hierarchical) in BUILTIN_POST_TYPES {
        sqlx::query("INSERT OR IGNORE INTO post_types (name, label, public, hierarchical) VALUES (?, ?, ?, ?)")
            .bind(name)
            .bind(label)
            .bind(public)
            .bind(hierarchical)
            .execute(pool)
            .await?;
    }

    for (name, label, public, object_type) in BUILTIN_TAXONOMIES {
        sqlx::query("INSERT OR IGNORE INTO taxonomies (name, label, public, object_type) VALUES (?, ?, ?, ?)")
            .bind(name)
            .bind(label)
            .bind(public)
            .bind(object_type)
            .execute(pool)
            .await?;
    }

    tracing::debug!("Database migrations complete");
    Ok(())
}

/// Current time as RFC 3339 / 当前时间
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// In-memory database with the schema applied (single connection) / 测试用内存数据库
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
