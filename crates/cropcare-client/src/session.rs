//! Session context
//!
//! The access token is persisted twice, in a cookie store and in local
//! storage, under one shared key. Its JWT payload is decoded on demand (no
//! signature check; the backend verifies) to route the user by role.
//!
//! Lifecycle:
//! - `init` on load: read the stored token and try to decode it
//! - `establish` after login: write the token to both stores
//! - `teardown` on logout: clear every auth entry from both stores

use crate::config::ClientConfig;
use crate::error::SessionError;
use crate::notice::Route;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Extra keys cleared on teardown besides the configured auth key
pub const LEGACY_TOKEN_KEYS: [&str; 2] = ["accessToken", "refreshToken"];

/// Key the refresh token cookie is stored under
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Key/value persistence backing a session (cookie jar, local storage)
pub trait CredentialStore: Send + Sync {
    /// Stored value
    fn get(&self, key: &str) -> Option<String>;
    /// Insert or overwrite
    fn set(&self, key: &str, value: &str);
    /// Delete if present
    fn remove(&self, key: &str);
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// No entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.inner.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.inner.lock().remove(key);
    }
}

/// Account role carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Farmer,
}

impl Role {
    /// Parse a role claim, ignoring case
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "farmer" => Some(Role::Farmer),
            _ => None,
        }
    }

    /// Lowercase name used for routing
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Farmer => "farmer",
        }
    }

    /// Dashboard this role lands on
    #[inline]
    #[must_use]
    pub fn landing_route(&self) -> Route {
        match self {
            Role::Admin => Route::AdminDashboard,
            Role::Farmer => Route::FarmerDashboard,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    role: Option<String>,
    email: Option<String>,
    id: Option<String>,
    exp: Option<i64>,
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub role: Role,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Claims {
    /// Whether `exp` is at or before `now`; tokens without `exp` never expire
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Decode the payload segment of a JWT
///
/// # Errors
/// Malformed structure, bad base64, non-JSON payload or unknown role.
pub fn decode_claims(token: &str) -> Result<Claims, SessionError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(SessionError::MalformedToken("expected three segments"));
    };
    if payload.is_empty() {
        return Err(SessionError::MalformedToken("empty payload"));
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let raw: RawClaims = serde_json::from_slice(&bytes)?;

    let role = raw
        .role
        .as_deref()
        .and_then(Role::parse)
        .ok_or(SessionError::UnknownRole(raw.role.clone()))?;

    Ok(Claims {
        role,
        email: raw.email,
        user_id: raw.id,
        expires_at: raw.exp.and_then(|secs| DateTime::from_timestamp(secs, 0)),
    })
}

/// Established session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
    claims: Claims,
}

impl Session {
    /// Raw access token for `Authorization` headers
    #[inline]
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Decoded payload
    #[inline]
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Shortcut for `claims().role`
    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.claims.role
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Explicit auth state handed to whatever needs it
pub struct SessionContext {
    cookies: Arc<dyn CredentialStore>,
    storage: Arc<dyn CredentialStore>,
    auth_key: String,
}

impl SessionContext {
    /// Create over a cookie store and a local storage
    #[must_use]
    pub fn new(
        cookies: Arc<dyn CredentialStore>,
        storage: Arc<dyn CredentialStore>,
        auth_key: impl Into<String>,
    ) -> Self {
        Self {
            cookies,
            storage,
            auth_key: auth_key.into(),
        }
    }

    /// Create with process-local stores
    #[must_use]
    pub fn in_memory(config: &ClientConfig) -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            config.auth_key(),
        )
    }

    /// Storage key of the access token
    #[inline]
    #[must_use]
    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    /// Restore the session persisted by a previous page load
    ///
    /// When the two stores disagree, the first readable token wins and is
    /// written back to both. An expired token, or nothing readable at all,
    /// clears the session.
    pub fn init(&self) -> Option<Session> {
        match self.current() {
            Ok(None) => None,
            Ok(Some(session)) if session.claims.is_expired_at(Utc::now()) => {
                tracing::debug!("stored access token expired; clearing session");
                self.teardown();
                None
            }
            Ok(Some(session)) => {
                let token = Some(session.access_token());
                if self.storage.get(&self.auth_key).as_deref() != token
                    || self.cookies.get(&self.auth_key).as_deref() != token
                {
                    tracing::debug!("stores disagree on access token; resyncing");
                    self.establish(session.access_token());
                }
                Some(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored access token unreadable; clearing session");
                self.teardown();
                None
            }
        }
    }

    /// Persist an access token to both stores
    pub fn establish(&self, access_token: &str) {
        self.cookies.set(&self.auth_key, access_token);
        self.storage.set(&self.auth_key, access_token);
        tracing::debug!(key = %self.auth_key, "session established");
    }

    /// Persist the refresh token cookie
    pub fn store_refresh_token(&self, refresh_token: &str) {
        self.cookies.set(REFRESH_TOKEN_KEY, refresh_token);
    }

    /// Stored refresh token
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.cookies.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Stored access token, local storage first
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.stored_tokens().into_iter().next()
    }

    /// Decode the stored token now, falling back to the cookie when the
    /// local storage copy is unreadable
    ///
    /// # Errors
    /// A token is stored but none is readable.
    pub fn current(&self) -> Result<Option<Session>, SessionError> {
        let mut first_error = None;
        for access_token in self.stored_tokens() {
            match decode_claims(&access_token) {
                Ok(claims) => {
                    return Ok(Some(Session {
                        access_token,
                        claims,
                    }));
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(None), Err)
    }

    // Distinct non-empty tokens, local storage before cookie
    fn stored_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::with_capacity(2);
        for store in [&self.storage, &self.cookies] {
            if let Some(token) = store.get(&self.auth_key).filter(|t| !t.is_empty()) {
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
        }
        tokens
    }

    /// A token is stored
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.access_token().is_some()
    }

    /// Dashboard for the current role, or the login page
    #[must_use]
    pub fn landing_route(&self) -> Route {
        match self.current() {
            Ok(Some(session)) => session.role().landing_route(),
            _ => Route::Login,
        }
    }

    /// Remove every auth entry from both stores
    pub fn teardown(&self) {
        for store in [&self.cookies, &self.storage] {
            store.remove(&self.auth_key);
            for key in LEGACY_TOKEN_KEYS {
                store.remove(key);
            }
        }
        tracing::debug!("session cleared");
    }

    /// Log out and return where to go next
    pub fn sign_out(&self) -> Route {
        self.teardown();
        Route::Home
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("auth_key", &self.auth_key)
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropcare_test_utils::{expired_token_for_role, token_for_role};

    fn context() -> (Arc<MemoryStore>, Arc<MemoryStore>, SessionContext) {
        let cookies = Arc::new(MemoryStore::new());
        let storage = Arc::new(MemoryStore::new());
        let ctx = SessionContext::new(cookies.clone(), storage.clone(), "accessToken");
        (cookies, storage, ctx)
    }

    #[test]
    fn decodes_role_case_insensitively() {
        let claims = decode_claims(&token_for_role("FARMER")).unwrap();
        assert_eq!(claims.role, Role::Farmer);
        assert_eq!(claims.role.as_str(), "farmer");
        assert_eq!(claims.email.as_deref(), Some("farmer@example.com"));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(
            decode_claims("not-a-jwt"),
            Err(SessionError::MalformedToken(_))
        ));
        assert!(matches!(
            decode_claims("a.!!!.c"),
            Err(SessionError::Encoding(_))
        ));
        assert!(matches!(
            decode_claims(&token_for_role("GARDENER")),
            Err(SessionError::UnknownRole(Some(_)))
        ));
    }

    #[test]
    fn establish_writes_both_stores() {
        let (cookies, storage, ctx) = context();
        let token = token_for_role("ADMIN");
        ctx.establish(&token);

        assert_eq!(cookies.get("accessToken"), Some(token.clone()));
        assert_eq!(storage.get("accessToken"), Some(token));
        assert!(ctx.is_logged_in());
        assert_eq!(ctx.landing_route(), Route::AdminDashboard);
    }

    #[test]
    fn init_restores_from_cookie_when_storage_empty() {
        let (cookies, _storage, ctx) = context();
        cookies.set("accessToken", &token_for_role("farmer"));
        let session = ctx.init().unwrap();
        assert_eq!(session.role(), Role::Farmer);
    }

    #[test]
    fn init_clears_unreadable_token() {
        let (cookies, storage, ctx) = context();
        storage.set("accessToken", "garbage");
        cookies.set("accessToken", "garbage");
        assert!(ctx.init().is_none());
        assert!(storage.is_empty());
        assert!(cookies.is_empty());
    }

    #[test]
    fn init_falls_back_to_readable_cookie() {
        let (cookies, storage, ctx) = context();
        let token = token_for_role("farmer");
        storage.set("accessToken", "garbage");
        cookies.set("accessToken", &token);

        let session = ctx.init().unwrap();
        assert_eq!(session.role(), Role::Farmer);
        assert_eq!(storage.get("accessToken"), Some(token.clone()));
        assert_eq!(cookies.get("accessToken"), Some(token));
    }

    #[test]
    fn empty_storage_entry_does_not_hide_cookie() {
        let (cookies, storage, ctx) = context();
        storage.set("accessToken", "");
        cookies.set("accessToken", &token_for_role("admin"));
        assert!(ctx.is_logged_in());
        assert_eq!(ctx.landing_route(), Route::AdminDashboard);
    }

    #[test]
    fn init_clears_expired_token() {
        let (_cookies, storage, ctx) = context();
        storage.set("accessToken", &expired_token_for_role("farmer"));
        assert!(ctx.init().is_none());
        assert!(!ctx.is_logged_in());
    }

    #[test]
    fn teardown_removes_all_auth_entries() {
        let (cookies, storage, ctx) = context();
        ctx.establish(&token_for_role("farmer"));
        ctx.store_refresh_token("refresh-1");
        storage.set("theme", "dark");

        assert_eq!(ctx.sign_out(), Route::Home);
        assert!(cookies.is_empty());
        assert_eq!(storage.len(), 1);
        assert_eq!(ctx.landing_route(), Route::Login);
    }

    #[test]
    fn custom_auth_key_is_also_cleared() {
        let cookies = Arc::new(MemoryStore::new());
        let storage = Arc::new(MemoryStore::new());
        let ctx = SessionContext::new(cookies.clone(), storage.clone(), "cropcareToken");
        ctx.establish("x.y.z");
        assert_eq!(storage.get("cropcareToken").as_deref(), Some("x.y.z"));
        ctx.teardown();
        assert!(storage.is_empty());
    }

    #[test]
    fn session_debug_redacts_token() {
        let (_c, _s, ctx) = context();
        let token = token_for_role("farmer");
        ctx.establish(&token);
        let session = ctx.current().unwrap().unwrap();
        assert!(!format!("{session:?}").contains(&token));
    }
}
