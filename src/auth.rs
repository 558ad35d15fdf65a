use sqlx::SqlitePool;
use tower_cookies::Cookies;

use acp_backend::models::{parse_capabilities, Caller};

/// Session cookie name / 会话 Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "acp_session";

/// Resolve the caller from the session cookie / 从会话 Cookie 解析调用者
///
/// Missing, unknown or expired sessions resolve to an anonymous caller.
pub async fn resolve_caller(pool: &SqlitePool, cookies: &Cookies) -> Caller {
    let Some(session_id) = cookies.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string()) else {
        return Caller::anonymous();
    };

    let row: Option<(i64, String)> = match sqlx::query_as(
        "SELECT u.id, u.capabilities FROM users u
         JOIN sessions s ON u.id = s.user_id
         WHERE s.id = ? AND s.expires_at > datetime('now')",
    )
    .bind(&session_id)
    .fetch_optional(pool)
    .await
    {
        Ok(row) => row,
        Err(e) => {
            tracing::warn!("Session lookup failed: {}", e);
            None
        }
    };

    match row {
        Some((user_id, capabilities)) => Caller {
            user_id: Some(user_id),
            session_token: Some(session_id),
            capabilities: parse_capabilities(&capabilities),
        },
        None => Caller::anonymous(),
    }
}
