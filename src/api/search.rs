use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tower_cookies::Cookies;

use acp_backend::sources::posts::searchable_post_types;

use crate::auth::resolve_caller;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub command: Option<String>,
}

/// GET /api/search?command= - 命令面板搜索
pub async fn search(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Query(params): Query<SearchParams>,
) -> Response {
    let caller = resolve_caller(&state.db, &cookies).await;

    match state.palette.dispatch(params.command.as_deref(), &caller).await {
        Ok(set) => Json(set).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": e.code(), "message": e.to_string() })),
        )
            .into_response(),
    }
}

/// GET /api/help - 可搜索的文章类型
pub async fn help(State(state): State<Arc<AppState>>) -> Response {
    match searchable_post_types(&state.db, &state.config.search.included_post_types).await {
        Ok(post_types) => Json(json!({ "postTypes": post_types })).into_response(),
        Err(e) => {
            tracing::error!("Failed to list post types: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "code": e.code(), "message": "服务器错误" })),
            )
                .into_response()
        }
    }
}
