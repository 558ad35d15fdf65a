//! Search module - parses commands, fans out to sources, ranks the merge / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - query: command text → `ParsedQuery` (pure, no I/O)
//! - engine: selects sources by filter, runs them concurrently, merges in a fixed order
//! - rank: edit distance ordering and the result cap
//! - Call direction: Palette → Search → Sources (unidirectional) / 调用方向

pub mod engine;
pub mod query;
pub mod rank;
pub mod schema;

pub use engine::SearchEngine;
pub use query::{parse, FilterKind, ParsedQuery};
pub use rank::{levenshtein_distance, rank_and_truncate};
pub use schema::{ResultItem, ResultSet};
