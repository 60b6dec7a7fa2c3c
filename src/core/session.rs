//! Per-visitor session identity
//!
//! Carts belong to an opaque token stored in the `phew_session` cookie. The
//! [`session_layer`] middleware resolves that token once per request and
//! handlers receive it as a [`SessionId`] extractor. The same layer carries
//! the visitor's pending notices in and out of the `phew_flash` cookie.

use axum::extract::{FromRequestParts, Request};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::core::error::ShopError;
use crate::core::flash::Flashes;

/// Name of the cookie carrying the session identifier
pub const SESSION_COOKIE: &str = "phew_session";

/// Opaque identifier scoping cart rows to one visitor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Issue a fresh, universally unique identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return the visitor's session id, issuing one if none is attached
///
/// The boolean is `true` when a new identifier was generated and must be
/// written back to the visitor. Values that are not UUIDs are replaced.
pub fn get_or_create_session_id(headers: &HeaderMap) -> (SessionId, bool) {
    match read_session_cookie(headers) {
        Some(id) => (id, false),
        None => (SessionId::generate(), true),
    }
}

/// Value of the named cookie, if the request carries it
pub(crate) fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

fn read_session_cookie(headers: &HeaderMap) -> Option<SessionId> {
    read_cookie(headers, SESSION_COOKIE)
        .and_then(|value| Uuid::parse_str(value).ok())
        .map(|uuid| SessionId(uuid.to_string()))
}

fn session_cookie(id: &SessionId) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// Middleware attaching a [`SessionId`] and its [`Flashes`] to every request
pub async fn session_layer(mut req: Request, next: Next) -> Response {
    let (session_id, created) = get_or_create_session_id(req.headers());
    if created {
        tracing::debug!(session_id = %session_id, "issued new session");
    }
    let flashes = Flashes::from_headers(req.headers());

    req.extensions_mut().insert(session_id.clone());
    req.extensions_mut().insert(flashes.clone());
    let mut response = next.run(req).await;

    let mut cookies = Vec::new();
    if created {
        cookies.push(session_cookie(&session_id));
    }
    cookies.extend(flashes.set_cookie_value());

    for cookie in cookies {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = ShopError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .ok_or_else(|| ShopError::Internal("session layer is not installed".to_string()))
    }
}
