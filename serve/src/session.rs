//! Session cookie middleware.
//!
//! Reads `docchat_session` from the `Cookie` header. When it is missing or malformed a new id
//! is generated and returned in `Set-Cookie`. Handlers get the id via `Extension<SessionId>`.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

pub(crate) const SESSION_COOKIE: &str = "docchat_session";

/// Session id of the current request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionId(pub(crate) String);

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Session id from the request's cookies, if present and well-formed.
pub(crate) fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| is_valid_session_id(id))
}

fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

pub(crate) async fn session_middleware(mut req: Request, next: Next) -> Response {
    let (id, is_new) = match session_id_from_headers(req.headers()) {
        Some(id) => (id, false),
        None => (docchat::new_session_id(), true),
    };
    req.extensions_mut().insert(SessionId(id.clone()));
    let mut response = next.run(req).await;
    if is_new {
        match HeaderValue::from_str(&session_cookie(&id)) {
            Ok(v) => {
                response.headers_mut().append(header::SET_COOKIE, v);
            }
            Err(e) => tracing::warn!("session cookie header: {}", e),
        }
    }
    response
}
