//! Search result schema / 搜索结果结构定义

use serde::{Deserialize, Serialize};

/// Result item - the single output unit of every search and action / 结果条目
///
/// Field names are the wire format consumed by the palette frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Display title / 标题
    pub title: String,
    /// Post type slug, taxonomy slug, `user`, `Admin Page` or `plugin` / 对象类型
    pub object_type: String,
    /// Extra context such as the ancestor chain / 附加上下文
    pub subtitle: String,
    /// Edit or action link / 链接
    pub url: String,
}

impl ResultItem {
    pub fn new(
        title: impl Into<String>,
        object_type: impl Into<String>,
        subtitle: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            object_type: object_type.into(),
            subtitle: subtitle.into(),
            url: url.into(),
        }
    }
}

/// Result set / 结果集
///
/// `count` is the total number of matches reported by the sources and may be
/// larger than `results.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub results: Vec<ResultItem>,
    pub count: usize,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Result set whose count is exactly its length / 计数等于条目数
    pub fn from_items(results: Vec<ResultItem>) -> Self {
        let count = results.len();
        Self { results, count }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
