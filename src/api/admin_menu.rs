use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tower_cookies::Cookies;

use acp_backend::admin_menu::{CacheStatus, RawAdminMenu};
use acp_backend::models::CAP_MANAGE_OPTIONS;

use crate::api::ApiResponse;
use crate::auth::resolve_caller;
use crate::state::AppState;

type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// 验证管理选项权限
async fn require_manage_options(state: &AppState, cookies: &Cookies) -> Result<(), ApiError> {
    let caller = resolve_caller(&state.db, cookies).await;
    if caller.user_id.is_none() {
        return Err((StatusCode::UNAUTHORIZED, Json(ApiResponse::error(401, "未登录"))));
    }
    if !caller.can(CAP_MANAGE_OPTIONS) {
        return Err((StatusCode::FORBIDDEN, Json(ApiResponse::error(403, "需要管理员权限"))));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PublishResult {
    pub entries: usize,
}

/// GET /api/admin-menu - 菜单快照状态
pub async fn status(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<ApiResponse<CacheStatus>>, ApiError> {
    require_manage_options(&state, &cookies).await?;
    Ok(Json(ApiResponse::success(state.admin_menu.status())))
}

/// POST /api/admin-menu - 发布后台菜单
pub async fn publish(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(raw): Json<RawAdminMenu>,
) -> Result<Json<ApiResponse<PublishResult>>, ApiError> {
    require_manage_options(&state, &cookies).await?;
    let entries = state.admin_menu.populate(&raw);
    Ok(Json(ApiResponse::success(PublishResult { entries })))
}

/// POST /api/admin-menu/invalidate - 清除菜单快照
pub async fn invalidate(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_manage_options(&state, &cookies).await?;
    state.admin_menu.invalidate();
    Ok(Json(ApiResponse::success(())))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;

    use crate::api::router;
    use crate::api::test_support::{login, send, test_state};

    fn post_json(uri: &str, session: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, format!("acp_session={}", session));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn menu() -> serde_json::Value {
        json!({
            "menu": [
                {"title": "Settings", "slug": "options-general.php"},
                {"title": "Tools", "slug": "tools.php"}
            ],
            "submenu": [
                {"parent": "options-general.php", "items": [
                    {"title": "General", "slug": "options-general.php"},
                    {"title": "Reading", "slug": "options-reading.php"}
                ]}
            ]
        })
    }

    #[tokio::test]
    async fn test_publish_requires_login_and_capability() {
        let state = test_state().await;
        let (status, _) = send(router(state.clone()), post_json("/api/admin-menu", None, menu())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let editor = login(&state.db, "editor", "edit_posts").await;
        let (status, _) = send(router(state.clone()), post_json("/api/admin-menu", Some(&editor), menu())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(state.admin_menu.pages().is_none());
    }

    #[tokio::test]
    async fn test_publish_search_and_invalidate() {
        let state = test_state().await;
        let admin = login(&state.db, "admin", "manage_options,activate_plugins").await;

        let (status, body) = send(router(state.clone()), post_json("/api/admin-menu", Some(&admin), menu())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["entries"], 4);

        let request = Request::get("/api/search?command=%3Aam").body(Body::empty()).unwrap();
        let (_, body) = send(router(state.clone()), request).await;
        assert_eq!(body["count"], 4);
        assert_eq!(body["results"][0]["object_type"], "Admin Page");
        assert_eq!(body["results"][0]["url"], "/wp-admin/options-general.php");

        let (status, _) = send(
            router(state.clone()),
            post_json("/api/admin-menu/invalidate", Some(&admin), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::get("/api/search?command=%3Aam%20read").body(Body::empty()).unwrap();
        let (_, body) = send(router(state.clone()), request).await;
        assert_eq!(body["count"], 0);
    }
}
