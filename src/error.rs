//! Palette error taxonomy / 命令面板错误类型
//!
//! Only `EmptyCommand` ever leaves the dispatcher; everything else is logged and
//! folded into an empty or partial result set.

use thiserror::Error;

use crate::sources::SourceKind;

#[derive(Debug, Error)]
pub enum PaletteError {
    /// No command text was supplied / 未提供命令
    #[error("A command was not found.")]
    EmptyCommand,

    /// One source adapter could not complete / 单个数据源失败
    #[error("source {source_kind} failed: {reason}")]
    SourceFailure { source_kind: SourceKind, reason: String },

    /// One source adapter exceeded its time budget / 数据源超时
    #[error("source {source_kind} timed out after {timeout_ms}ms")]
    SourceTimeout { source_kind: SourceKind, timeout_ms: u64 },

    /// Every invoked source failed / 所有数据源均失败
    #[error("all {0} invoked sources failed")]
    AllSourcesFailed(usize),

    /// Action command without the required capability / 无权执行动作
    #[error("caller lacks capability `{0}`")]
    UnauthorizedAction(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PaletteError {
    /// Machine-readable code used on the wire / 返回给客户端的错误码
    pub fn code(&self) -> &'static str {
        match self {
            PaletteError::EmptyCommand => "no_command_found",
            PaletteError::SourceFailure { .. } => "source_failure",
            PaletteError::SourceTimeout { .. } => "source_timeout",
            PaletteError::AllSourcesFailed(_) => "all_sources_failed",
            PaletteError::UnauthorizedAction(_) => "unauthorized_action",
            PaletteError::Database(_) => "database_error",
        }
    }
}

pub type PaletteResult<T> = Result<T, PaletteError>;
