//! Cookie session middleware.
//!
//! Every request through [`session_layer`] is bound to a session: the one
//! named by a valid signed `sessionID` cookie, or a fresh one. Handlers
//! reach it with the [`CurrentSession`] extractor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};

use crate::auth::{MemorySessionStore, SessionStore};
use crate::config::WebConfig;
use crate::db::SqlValue;
use crate::web::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sessionID";

/// Shared state of the session layer.
#[derive(Clone)]
pub struct SessionState {
    /// Backing session store.
    pub store: Arc<dyn SessionStore>,
    /// Cookie signing key.
    key: Key,
    /// Whether to mark the cookie `Secure`.
    cookie_secure: bool,
}

impl SessionState {
    /// Create a session state with an explicit store.
    ///
    /// The signing key is the SHA-512 digest of `secret`.
    pub fn new(store: Arc<dyn SessionStore>, secret: &str, cookie_secure: bool) -> Self {
        let digest = Sha512::digest(secret.as_bytes());
        Self {
            store,
            key: Key::from(digest.as_slice()),
            cookie_secure,
        }
    }

    /// Create a session state backed by an in-memory store.
    pub fn from_config(config: &WebConfig) -> Self {
        let store = MemorySessionStore::with_max_age(Duration::from_secs(
            config.session_max_age_secs,
        ));
        Self::new(Arc::new(store), &config.session_secret, config.cookie_secure)
    }

    /// Build the session cookie for `id`.
    fn cookie(&self, id: &str) -> Cookie<'static> {
        let max_age = i64::try_from(self.store.max_age().as_secs()).unwrap_or(i64::MAX);
        Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.cookie_secure)
            .max_age(time::Duration::seconds(max_age))
            .build()
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("store", &self.store)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Handle to the session bound to the current request.
#[derive(Clone)]
pub struct SessionHandle {
    id: String,
    store: Arc<dyn SessionStore>,
    // Set when the cookie must be re-sent (login refreshes the expiry).
    renew_cookie: Arc<AtomicBool>,
}

impl SessionHandle {
    fn new(id: String, store: Arc<dyn SessionStore>) -> Self {
        Self {
            id,
            store,
            renew_cookie: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Student number the session is logged in as.
    pub fn post_no(&self) -> Option<SqlValue> {
        self.store.load(&self.id).and_then(|s| s.post_no)
    }

    /// Check if the session holds a student number.
    pub fn is_logged_in(&self) -> bool {
        self.post_no().is_some()
    }

    /// Attach a student number and extend the session.
    ///
    /// Returns false if the session vanished (expired) mid-request.
    pub fn login(&self, post_no: SqlValue) -> bool {
        if !self.store.set_post_no(&self.id, Some(post_no)) {
            return false;
        }
        self.store.refresh(&self.id);
        self.renew_cookie.store(true, Ordering::Relaxed);
        true
    }

    /// Clear the student number.
    ///
    /// Returns false if the session was not logged in.
    pub fn logout(&self) -> bool {
        if !self.is_logged_in() {
            return false;
        }
        self.store.set_post_no(&self.id, None)
    }

    fn needs_cookie(&self) -> bool {
        self.renew_cookie.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").field("id", &self.id).finish()
    }
}

/// Middleware binding each request to a session.
///
/// Unknown, expired, or tampered cookies start a new session. The cookie
/// is sent when the session is new or was renewed by the handler.
pub async fn session_layer(
    State(state): State<Arc<SessionState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = SignedCookieJar::from_headers(request.headers(), state.key.clone());

    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.store.load(cookie.value()));
    let (session, is_new) = match existing {
        Some(session) => (session, false),
        None => (state.store.create(), true),
    };

    let handle = SessionHandle::new(session.id.clone(), state.store.clone());
    request.extensions_mut().insert(handle.clone());

    let response = next.run(request).await;

    if is_new || handle.needs_cookie() {
        let jar = jar.add(state.cookie(&session.id));
        return (jar, response).into_response();
    }
    response
}

/// Extractor for the current request's session.
///
/// Rejects with 500 if the session layer is not installed.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionHandle);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let handle = parts.extensions.get::<SessionHandle>().cloned().ok_or_else(|| {
                tracing::error!("Session layer not configured");
                ApiError::internal()
            })?;
            Ok(CurrentSession(handle))
        })
    }
}
