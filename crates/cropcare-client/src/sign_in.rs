//! Sign-in and token refresh

use crate::api::{AuthApi, LoginPayload};
use crate::error::SignInError;
use crate::guard::InFlight;
use crate::notice::{Notice, Route};
use crate::session::{decode_claims, Role, SessionContext};
use cropcare_forms::{SignInDraft, Validate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of a successful sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedIn {
    pub role: Role,
    pub route: Route,
}

impl SignedIn {
    /// Success notification
    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice::success("Login successful")
    }
}

/// Signs a user in against an `AuthApi`
#[derive(Debug)]
pub struct SignInSequencer<A: AuthApi> {
    api: Arc<A>,
    session: Arc<SessionContext>,
    in_flight: AtomicBool,
}

impl<A: AuthApi> SignInSequencer<A> {
    /// Create sequencer
    #[must_use]
    pub fn new(api: Arc<A>, session: Arc<SessionContext>) -> Self {
        Self {
            api,
            session,
            in_flight: AtomicBool::new(false),
        }
    }

    /// A sign-in is currently running
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate, log in and establish the session
    ///
    /// # Errors
    /// Invalid credentials, a refusal, or an unreadable token.
    pub async fn sign_in(&self, draft: &SignInDraft) -> Result<SignedIn, SignInError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return Err(SignInError::AlreadyInFlight);
        };

        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(SignInError::ValidationFailed(errors));
        }

        let credentials = LoginPayload::from(draft);
        tracing::info!(email = %credentials.email, "signing in");
        let reply = self
            .api
            .login(&credentials)
            .await
            .map_err(SignInError::Unreachable)?;

        if !reply.success {
            tracing::warn!(message = %reply.message, "sign-in rejected");
            return Err(SignInError::Rejected {
                message: reply.message,
            });
        }

        let tokens = reply.data.unwrap_or_default();
        let access_token = tokens.access_token().ok_or(SignInError::MissingToken)?;
        let claims = decode_claims(access_token)?;

        self.session.establish(access_token);
        if let Some(refresh_token) = tokens.refresh_token() {
            self.session.store_refresh_token(refresh_token);
        }

        tracing::info!(role = claims.role.as_str(), "signed in");
        Ok(SignedIn {
            role: claims.role,
            route: claims.role.landing_route(),
        })
    }

    /// Trade the stored refresh token for a new access token
    ///
    /// A refused refresh clears the session.
    ///
    /// # Errors
    /// No refresh token stored, a refusal, or an unreadable token.
    pub async fn refresh(&self) -> Result<SignedIn, SignInError> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(SignInError::NoRefreshToken)?;

        let reply = self
            .api
            .refresh_access_token(&refresh_token)
            .await
            .map_err(SignInError::Unreachable)?;

        if !reply.success {
            tracing::warn!(message = %reply.message, "refresh refused; clearing session");
            self.session.teardown();
            return Err(SignInError::Rejected {
                message: reply.message,
            });
        }

        let tokens = reply.data.unwrap_or_default();
        let access_token = tokens.access_token().ok_or(SignInError::MissingToken)?;
        let claims = decode_claims(access_token)?;
        self.session.establish(access_token);
        if let Some(rotated) = tokens.refresh_token() {
            self.session.store_refresh_token(rotated);
        }

        tracing::debug!(role = claims.role.as_str(), "access token refreshed");
        Ok(SignedIn {
            role: claims.role,
            route: claims.role.landing_route(),
        })
    }
}
