//! One-shot notices shown after a redirect
//!
//! Notices travel in the `phew_flash` cookie, so the server keeps no state
//! for visitors who never return. [`session_layer`](crate::core::session::session_layer)
//! decodes the cookie into a per-request [`Flashes`] handle and writes it
//! back (or expires it) once the handler has run.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::error::ShopError;
use crate::core::session::read_cookie;

/// Name of the cookie carrying pending notices
pub const FLASH_COOKIE: &str = "phew_flash";

/// Encoded cookies above this size are ignored
const MAX_COOKIE_LEN: usize = 4096;

/// Notice category, rendered as a CSS class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
struct Pending {
    notices: Vec<Flash>,
    arrived_with_cookie: bool,
    changed: bool,
}

/// The notices of one request
///
/// Starts with whatever the visitor's cookie carried. Handlers queue new
/// notices with [`push`](Self::push) and page renders drain them with
/// [`take`](Self::take).
#[derive(Debug, Clone, Default)]
pub struct Flashes {
    pending: Arc<Mutex<Pending>>,
}

impl Flashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the notices carried by the request's flash cookie
    ///
    /// A cookie that does not decode is treated as empty and expired on the
    /// way out.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(raw) = read_cookie(headers, FLASH_COOKIE) else {
            return Self::new();
        };

        let notices = decode(raw).unwrap_or_else(|| {
            tracing::debug!("discarding unreadable flash cookie");
            Vec::new()
        });

        Self {
            pending: Arc::new(Mutex::new(Pending {
                notices,
                arrived_with_cookie: true,
                changed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a notice for the next page the visitor sees
    pub fn push(&self, flash: Flash) {
        let mut pending = self.lock();
        pending.notices.push(flash);
        pending.changed = true;
    }

    /// Remove and return every pending notice
    pub fn take(&self) -> Vec<Flash> {
        let mut pending = self.lock();
        pending.changed = true;
        std::mem::take(&mut pending.notices)
    }

    /// The `Set-Cookie` value to send back, if the cookie must change
    pub fn set_cookie_value(&self) -> Option<String> {
        let pending = self.lock();

        if pending.notices.is_empty() {
            return pending.arrived_with_cookie.then(expired_cookie);
        }
        if !pending.changed {
            return None;
        }

        match encode(&pending.notices) {
            Some(value) => Some(format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                FLASH_COOKIE, value
            )),
            None => pending.arrived_with_cookie.then(expired_cookie),
        }
    }
}

fn expired_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", FLASH_COOKIE)
}

fn encode(notices: &[Flash]) -> Option<String> {
    match serde_json::to_vec(notices) {
        Ok(json) => Some(URL_SAFE_NO_PAD.encode(json)),
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode flash notices");
            None
        }
    }
}

fn decode(raw: &str) -> Option<Vec<Flash>> {
    if raw.len() > MAX_COOKIE_LEN {
        return None;
    }
    let json = URL_SAFE_NO_PAD.decode(raw).ok()?;
    serde_json::from_slice(&json).ok()
}

impl<S> FromRequestParts<S> for Flashes
where
    S: Send + Sync,
{
    type Rejection = ShopError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Flashes>()
            .cloned()
            .ok_or_else(|| ShopError::Internal("session layer is not installed".to_string()))
    }
}
