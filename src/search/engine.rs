//! Search engine - selects sources, merges and ranks their results / 搜索引擎
//!
//! Architecture principle: sources only find, the engine controls flow / 架构原则
//! - select: which sources a filter needs / 选择数据源
//! - merge: concatenate in canonical source order / 按固定顺序合并
//! - rank: edit distance sort + cap when a keyword is present / 排序并截断

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use super::query::{FilterKind, ParsedQuery};
use super::rank::rank_and_truncate;
use super::schema::ResultSet;
use crate::error::{PaletteError, PaletteResult};
use crate::sources::{SearchSource, SourceHits, SourceKind};

/// Search engine / 搜索引擎
pub struct SearchEngine {
    /// Sources sorted by `SourceKind`, which is the merge order / 按合并顺序排列的数据源
    sources: Vec<Arc<dyn SearchSource>>,
    results_max: usize,
    source_timeout: Duration,
}

impl SearchEngine {
    pub fn new(mut sources: Vec<Arc<dyn SearchSource>>, results_max: usize, source_timeout: Duration) -> Self {
        sources.sort_by_key(|s| s.kind());
        Self {
            sources,
            results_max,
            source_timeout,
        }
    }

    /// Sources a filter needs, in merge order / 过滤器需要的数据源
    fn selected(&self, filter: FilterKind) -> Vec<&Arc<dyn SearchSource>> {
        self.sources.iter().filter(|s| selects(filter, s.kind())).collect()
    }

    /// Run one source under the time budget / 在超时限制内运行单个数据源
    async fn run_source(&self, source: &dyn SearchSource, query: &ParsedQuery) -> PaletteResult<SourceHits> {
        let kind = source.kind();
        let scope = scope_for(query, kind);
        match tokio::time::timeout(self.source_timeout, source.find(&query.keyword, scope, self.results_max)).await {
            Ok(Ok(hits)) => Ok(hits),
            Ok(Err(e)) => Err(PaletteError::SourceFailure {
                source_kind: kind,
                reason: e.to_string(),
            }),
            Err(_) => Err(PaletteError::SourceTimeout {
                source_kind: kind,
                timeout_ms: self.source_timeout.as_millis() as u64,
            }),
        }
    }

    /// Search (primitive operation) / 搜索
    ///
    /// A failing source contributes nothing; only when every selected source
    /// fails is `AllSourcesFailed` returned.
    pub async fn search(&self, query: &ParsedQuery) -> PaletteResult<ResultSet> {
        let selected = self.selected(query.filter_kind);
        if selected.is_empty() {
            return Ok(ResultSet::empty());
        }

        tracing::debug!(
            "Searching {:?} with filter={} scope={:?} keyword={:?}",
            selected.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            query.filter_kind,
            query.scope_selectors,
            query.keyword
        );

        // join_all keeps input order, so merging stays deterministic
        let outcomes = join_all(selected.iter().map(|s| self.run_source(s.as_ref(), query))).await;

        let mut results = Vec::new();
        let mut count = 0usize;
        let mut failures = 0usize;
        for outcome in outcomes {
            match outcome {
                Ok(hits) => {
                    count += hits.total.max(hits.items.len());
                    results.extend(hits.items);
                }
                Err(e) => {
                    failures += 1;
                    tracing::warn!("Search source skipped: {}", e);
                }
            }
        }

        if failures == selected.len() {
            return Err(PaletteError::AllSourcesFailed(failures));
        }

        // Browse queries such as `:am` return everything unranked
        if query.has_keyword() {
            rank_and_truncate(&mut results, &query.keyword, self.results_max);
        }

        Ok(ResultSet { results, count })
    }
}

/// Whether a filter invokes a source / 过滤器是否调用该数据源
pub fn selects(filter: FilterKind, kind: SourceKind) -> bool {
    match filter {
        FilterKind::None => true,
        FilterKind::PostType => kind == SourceKind::Documents,
        FilterKind::Taxonomy => kind == SourceKind::TaxonomyTerms,
        FilterKind::User => kind == SourceKind::Users,
        FilterKind::AdminMenu => kind == SourceKind::AdminPages,
    }
}

/// Scope handed to a source: only the source the filter names receives it / 传给数据源的范围
fn scope_for(query: &ParsedQuery, kind: SourceKind) -> &[String] {
    match (query.filter_kind, kind) {
        (FilterKind::PostType, SourceKind::Documents) | (FilterKind::Taxonomy, SourceKind::TaxonomyTerms) => {
            &query.scope_selectors
        }
        _ => &[],
    }
}
