//! Source adapters - one per backing content store / 数据源适配器
//!
//! Architecture principles / 架构原则：
//! - Sources only answer `find(keyword, scope, limit)`; they never rank or cap
//! - The search engine decides which sources run and merges their output
//! - Call direction: Engine → Source (unidirectional) / 调用方向

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::PaletteResult;
use crate::search::ResultItem;

pub mod admin_pages;
pub mod posts;
pub mod terms;
pub mod users;

pub use admin_pages::AdminPageSource;
pub use posts::PostSource;
pub use terms::TermSource;
pub use users::UserSource;

/// Source kind, declared in canonical merge order / 数据源类型（按合并顺序声明）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Documents,
    TaxonomyTerms,
    Users,
    AdminPages,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Documents => "documents",
            SourceKind::TaxonomyTerms => "taxonomy_terms",
            SourceKind::Users => "users",
            SourceKind::AdminPages => "admin_pages",
        };
        f.write_str(name)
    }
}

/// Items returned by one source plus the total it matched / 单个数据源的结果
#[derive(Debug, Clone, Default)]
pub struct SourceHits {
    pub items: Vec<ResultItem>,
    /// Total matches in the store, may exceed `items.len()` / 匹配总数
    pub total: usize,
}

impl SourceHits {
    pub fn new(items: Vec<ResultItem>, total: usize) -> Self {
        Self { items, total }
    }
}

/// Search source trait / 数据源 trait
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Which store this source wraps / 数据源类型
    fn kind(&self) -> SourceKind;

    /// Find matching records / 查找匹配记录
    ///
    /// `scope` restricts the search to content type names; empty means the
    /// source's defaults. `limit` caps `items`, never `total`.
    async fn find(&self, keyword: &str, scope: &[String], limit: usize) -> PaletteResult<SourceHits>;
}

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern / 转义 LIKE 通配符
pub fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// `LIMIT` bind value; SQLite reads a negative limit as unbounded / LIMIT 参数
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// `?, ?, ?` placeholder list for an `IN (...)` clause / 生成占位符
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
