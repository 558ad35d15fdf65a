//! Command query parser / 命令查询解析器
//!
//! Grammar (first matching rule wins / 按顺序匹配，先到先得):
//! 1. `:pt=a,b` - post type search restricted to `a`, `b`
//! 2. `:t=a,b`  - taxonomy term search restricted to `a`, `b`
//! 3. `:u`      - user search
//! 4. `:am`     - admin menu search
//! 5. anything else - search every source
//!
//! Example: `:pt=page,post pirates` -> post types `[page, post]`, keyword `pirates`

use std::fmt;

use serde::Serialize;

/// Filter kind / 过滤类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    None,
    PostType,
    Taxonomy,
    User,
    AdminMenu,
}

impl FilterKind {
    /// Filter marker as typed by the user / 过滤标记
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            FilterKind::None => None,
            FilterKind::PostType => Some(":pt="),
            FilterKind::Taxonomy => Some(":t="),
            FilterKind::User => Some(":u"),
            FilterKind::AdminMenu => Some(":am"),
        }
    }

    /// Whether the marker is followed by a comma separated scope list / 是否带范围列表
    pub fn takes_scope(&self) -> bool {
        matches!(self, FilterKind::PostType | FilterKind::Taxonomy)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::None => "none",
            FilterKind::PostType => "post_type",
            FilterKind::Taxonomy => "taxonomy",
            FilterKind::User => "user",
            FilterKind::AdminMenu => "admin_menu",
        };
        f.write_str(name)
    }
}

/// Precedence order of the recognized filters / 过滤优先级
const FILTER_PRECEDENCE: [FilterKind; 4] = [
    FilterKind::PostType,
    FilterKind::Taxonomy,
    FilterKind::User,
    FilterKind::AdminMenu,
];

/// Parsed query / 解析后的查询
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuery {
    pub filter_kind: FilterKind,
    /// Requested post types or taxonomies, empty means defaults / 范围选择器
    pub scope_selectors: Vec<String>,
    /// Free text left after the filter syntax is removed / 关键词
    pub keyword: String,
}

impl ParsedQuery {
    /// Unfiltered query for a plain keyword / 无过滤的关键词查询
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            filter_kind: FilterKind::None,
            scope_selectors: Vec::new(),
            keyword: keyword.into().trim().to_string(),
        }
    }

    pub fn has_keyword(&self) -> bool {
        !self.keyword.is_empty()
    }
}

/// Split the command into whitespace separated words / 按空白切分
fn tokenize(raw: &str) -> Vec<&str> {
    raw.split_whitespace().collect()
}

/// Detect the honored filter / 识别生效的过滤器
fn detect_filter(words: &[&str]) -> FilterKind {
    FILTER_PRECEDENCE
        .iter()
        .copied()
        .find(|kind| {
            kind.marker()
                .map(|marker| words.iter().any(|w| w.contains(marker)))
                .unwrap_or(false)
        })
        .unwrap_or(FilterKind::None)
}

/// Collect the scope list from every word carrying the marker / 收集范围列表
///
/// `:pt=page :pt=post,page` -> `[page, post]`
fn collect_scopes(words: &[&str], marker: &str) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    for word in words {
        let Some(pos) = word.find(marker) else {
            continue;
        };
        let list = &word[pos + marker.len()..];
        for scope in list.split(',') {
            let scope = scope.trim();
            if !scope.is_empty() && !scopes.iter().any(|s| s == scope) {
                scopes.push(scope.to_string());
            }
        }
    }
    scopes
}

/// Parse a raw command / 解析原始命令
pub fn parse(raw: &str) -> ParsedQuery {
    let words = tokenize(raw);
    let filter_kind = detect_filter(&words);

    let Some(marker) = filter_kind.marker() else {
        return ParsedQuery::keyword(raw);
    };

    if filter_kind.takes_scope() {
        let scope_selectors = collect_scopes(&words, marker);
        // The marker and its scope list run to the end of the word; text in
        // front of the marker stays part of the keyword
        let keyword = words
            .iter()
            .filter_map(|w| match w.find(marker) {
                Some(pos) => Some(&w[..pos]).filter(|prefix| !prefix.is_empty()),
                None => Some(*w),
            })
            .collect::<Vec<_>>()
            .join(" ");
        return ParsedQuery {
            filter_kind,
            scope_selectors,
            keyword,
        };
    }

    // Marker-only filters: strip the marker, keep whatever else the word held
    let keyword = words
        .iter()
        .map(|w| w.replace(marker, ""))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    ParsedQuery {
        filter_kind,
        scope_selectors: Vec::new(),
        keyword,
    }
}
