use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use super::error::ApiError;

pub const SESSION_COOKIE: &str = "wattmap_session";

/// Session id resolved by [`session_middleware`] for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Reuse the browser's session cookie or issue a new one.
pub async fn session_middleware(jar: CookieJar, mut req: Request, next: Next) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());
    let id = existing.unwrap_or_else(Uuid::new_v4);
    req.extensions_mut().insert(SessionId(id));

    let response = next.run(req).await;
    if existing.is_some() {
        return response;
    }

    tracing::debug!(session = %id, "issuing session cookie");
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), response).into_response()
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .copied()
            .ok_or_else(|| ApiError::InternalError("session middleware not installed".to_string()))
    }
}
