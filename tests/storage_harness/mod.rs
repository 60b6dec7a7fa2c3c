//! Shared test harness for storage backend testing
//!
//! Provides fixtures for cart, order and feedback tests, plus the
//! `shop_store_tests!` and `shop_http_tests!` suites that every backend runs.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

pub mod http_tests;
pub mod shop_store_tests;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use chrono::NaiveDate;
use std::sync::Mutex;
use tower::ServiceExt;

use phew::core::catalog::{Catalog, CatalogEntry};
use phew::core::model::NewFeedback;
use phew::core::session::{SESSION_COOKIE, SessionId};
use phew::core::validation::CustomerDetails;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A catalog entry from the standard catalog
pub fn entry(key: &str) -> CatalogEntry {
    Catalog::standard()
        .get(key)
        .cloned()
        .unwrap_or_else(|| panic!("no catalog entry '{}'", key))
}

pub fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Jane".to_string(),
        email: "jane@x.com".to_string(),
        phone: "555-1111".to_string(),
        event_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    }
}

pub fn new_feedback(name: &str, rating: i64) -> NewFeedback {
    NewFeedback {
        name: name.to_string(),
        rating,
        message: format!("message from {}", name),
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers (one cookie jar per visitor)
// ---------------------------------------------------------------------------

/// A browser with its own session cookie and whatever cookies the shop sets
pub struct Visitor {
    pub session: SessionId,
    jar: Mutex<Vec<(String, String)>>,
}

impl Visitor {
    pub fn new() -> Self {
        let session = SessionId::generate();
        let jar = vec![(SESSION_COOKIE.to_string(), session.to_string())];
        Self {
            session,
            jar: Mutex::new(jar),
        }
    }

    fn cookie_header(&self) -> String {
        self.jar
            .lock()
            .unwrap()
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Store or expire cookies the way a browser would
    fn remember(&self, page: &Page) {
        let mut jar = self.jar.lock().unwrap();
        for line in &page.set_cookies {
            let pair = line.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            jar.retain(|(existing, _)| existing != name);
            if !value.is_empty() && !line.contains("Max-Age=0") {
                jar.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Whether the jar currently holds the named cookie
    pub fn has_cookie(&self, name: &str) -> bool {
        self.jar.lock().unwrap().iter().any(|(existing, _)| existing == name)
    }

    async fn send(&self, app: &Router, request: Request<Body>) -> Page {
        let page = Page::from_response(app.clone().oneshot(request).await.unwrap()).await;
        self.remember(&page);
        page
    }

    pub async fn get(&self, app: &Router, uri: &str) -> Page {
        let request = Request::builder()
            .uri(uri)
            .header(header::COOKIE, self.cookie_header())
            .body(Body::empty())
            .unwrap();
        self.send(app, request).await
    }

    pub async fn post_form(&self, app: &Router, uri: &str, form: &[(&str, &str)]) -> Page {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, self.cookie_header())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(form).unwrap()))
            .unwrap();
        self.send(app, request).await
    }
}

/// A request carrying only the given raw `Cookie` header, if any
pub async fn get_with_cookie(app: &Router, uri: &str, cookie: Option<&str>) -> Page {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let request = request.body(Body::empty()).unwrap();
    Page::from_response(app.clone().oneshot(request).await.unwrap()).await
}

/// A request from a browser that has no cookies yet
pub async fn anonymous_get(app: &Router, uri: &str) -> Page {
    get_with_cookie(app, uri, None).await
}

/// A response with its body read into memory
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    /// Every `Set-Cookie` header, in order
    pub set_cookies: Vec<String>,
    pub body: String,
}

impl Page {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        Self {
            status,
            location,
            set_cookies,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// The `Set-Cookie` line for the named cookie
    pub fn set_cookie(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}=", name);
        self.set_cookies
            .iter()
            .find(|line| line.starts_with(&prefix))
            .map(String::as_str)
    }

    /// Assert this is a redirect to `to`
    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }
}
