//! Register-then-login sequencing
//!
//! A submission runs strictly in order:
//! 1. Validate the draft locally; stop before any network call on errors
//! 2. Create the account
//! 3. Sign in with the credentials just registered
//! 4. Establish the session from the returned access token
//!
//! Nothing is retried.

use crate::api::{AuthApi, LoginData, LoginPayload, RegisterPayload};
use crate::error::SubmitError;
use crate::guard::InFlight;
use crate::notice::{Notice, Route};
use crate::session::SessionContext;
use cropcare_forms::{RegistrationDraft, RegistrationForm, Validate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Backend message for an email that already has an account
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Duplicate entry found";

/// Shown when the backend sends no message of its own
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Registration successful!";

/// Outcome of a completed registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    /// Backend confirmation
    pub message: String,
}

impl Registered {
    /// Success notification
    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice::success(self.message.clone())
    }

    /// Page shown after registering
    #[inline]
    #[must_use]
    pub fn route(&self) -> Route {
        Route::Home
    }
}

/// Drives one registration at a time against an `AuthApi`
#[derive(Debug)]
pub struct RegistrationSequencer<A: AuthApi> {
    api: Arc<A>,
    session: Arc<SessionContext>,
    in_flight: AtomicBool,
}

impl<A: AuthApi> RegistrationSequencer<A> {
    /// Create sequencer
    #[must_use]
    pub fn new(api: Arc<A>, session: Arc<SessionContext>) -> Self {
        Self {
            api,
            session,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Session the sequencer signs into
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// A submission is currently running
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Register and sign in
    ///
    /// # Errors
    /// One `SubmitError` variant per failure kind; see its `notice`.
    pub async fn submit(&self, draft: &RegistrationDraft) -> Result<Registered, SubmitError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::info!("registration already in flight; ignoring submit");
            return Err(SubmitError::AlreadyInFlight);
        };

        let errors = draft.validate();
        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "registration draft invalid");
            return Err(SubmitError::ValidationFailed(errors));
        }

        let payload = RegisterPayload::from(draft);
        tracing::info!(
            email = %payload.email,
            crops = payload.farmer_profile.crop_types.len(),
            "registering farmer account"
        );

        let reply = self.api.register_account(&payload).await.map_err(|e| {
            tracing::warn!(error = %e, "registration request failed");
            SubmitError::Unreachable(e)
        })?;

        if !reply.success {
            if reply.message.trim() == DUPLICATE_EMAIL_MESSAGE {
                tracing::warn!(email = %payload.email, "email already registered");
                return Err(SubmitError::DuplicateEmail);
            }
            tracing::warn!(message = %reply.message, "registration rejected");
            return Err(SubmitError::RegistrationRejected {
                message: reply.message,
            });
        }

        tracing::info!(email = %payload.email, "account created; signing in");
        let credentials = LoginPayload::new(payload.email.clone(), payload.password.clone());
        let tokens = match self.api.login(&credentials).await {
            Ok(login) => login.data.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "login after registration failed");
                LoginData::default()
            }
        };

        let Some(access_token) = tokens.access_token() else {
            tracing::warn!("login after registration returned no access token");
            return Err(SubmitError::PostRegistrationLoginFailed);
        };
        self.session.establish(access_token);
        if let Some(refresh_token) = tokens.refresh_token() {
            self.session.store_refresh_token(refresh_token);
        }

        let message = if reply.message.trim().is_empty() {
            DEFAULT_SUCCESS_MESSAGE.to_string()
        } else {
            reply.message
        };
        tracing::info!("registration complete");
        Ok(Registered { message })
    }

    /// Submit a form store, writing validation errors back into it
    ///
    /// The form is reset after a successful registration.
    ///
    /// # Errors
    /// Same as `submit`.
    pub async fn submit_form(
        &self,
        form: &mut RegistrationForm,
    ) -> Result<Registered, SubmitError> {
        let result = self.submit(form.draft()).await;
        match &result {
            Ok(_) => form.reset(),
            Err(SubmitError::ValidationFailed(errors)) => form.set_errors(errors.clone()),
            Err(_) => {}
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, MockAuthApi};
    use crate::error::ApiError;
    use crate::session::MemoryStore;
    use cropcare_forms::RegistrationField;
    use cropcare_test_utils::{token_for_role, valid_registration_draft, FARMER_EMAIL};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn session() -> Arc<SessionContext> {
        Arc::new(SessionContext::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            "accessToken",
        ))
    }

    fn registered() -> Result<ApiResponse<serde_json::Value>, ApiError> {
        Ok(ApiResponse::ok("Farmer registered successfully", None))
    }

    fn tokens(access: Option<String>) -> Result<ApiResponse<LoginData>, ApiError> {
        Ok(ApiResponse::ok(
            "Login successful",
            Some(LoginData {
                access_token: access,
                refresh_token: Some("refresh-1".to_string()),
            }),
        ))
    }

    #[tokio::test]
    async fn valid_draft_registers_and_signs_in() {
        let mut api = MockAuthApi::new();
        api.expect_register_account()
            .withf(|p| p.email == FARMER_EMAIL && p.farmer_profile.crop_types.len() == 1)
            .times(1)
            .returning(|_| registered());
        api.expect_login()
            .withf(|c| c.email == FARMER_EMAIL && c.password == "secret1")
            .times(1)
            .returning(|_| tokens(Some(token_for_role("FARMER"))));

        let session = session();
        let sequencer = RegistrationSequencer::new(Arc::new(api), session.clone());
        let done = sequencer.submit(&valid_registration_draft()).await.unwrap();

        assert_eq!(done.message, "Farmer registered successfully");
        assert_eq!(done.route(), Route::Home);
        assert!(session.is_logged_in());
        assert_eq!(session.refresh_token().as_deref(), Some("refresh-1"));
        assert!(!sequencer.is_in_flight());
    }

    #[tokio::test]
    async fn duplicate_email_never_logs_in() {
        let mut api = MockAuthApi::new();
        api.expect_register_account()
            .times(1)
            .returning(|_| Ok(ApiResponse::failed(DUPLICATE_EMAIL_MESSAGE)));
        api.expect_login().times(0);

        let sequencer = RegistrationSequencer::new(Arc::new(api), session());
        let err = sequencer
            .submit(&valid_registration_draft())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::DuplicateEmail));
    }

    #[tokio::test]
    async fn missing_token_is_partial_success_without_retry() {
        let mut api = MockAuthApi::new();
        api.expect_register_account()
            .times(1)
            .returning(|_| registered());
        api.expect_login().times(1).returning(|_| tokens(None));

        let session = session();
        let sequencer = RegistrationSequencer::new(Arc::new(api), session.clone());
        let err = sequencer
            .submit(&valid_registration_draft())
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::PostRegistrationLoginFailed));
        assert_eq!(err.next_route(), Some(Route::Login));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn login_transport_failure_is_partial_success() {
        let mut api = MockAuthApi::new();
        api.expect_register_account()
            .times(1)
            .returning(|_| registered());
        api.expect_login().times(1).returning(|_| {
            Err(ApiError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            })
        });

        let sequencer = RegistrationSequencer::new(Arc::new(api), session());
        let err = sequencer
            .submit(&valid_registration_draft())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::PostRegistrationLoginFailed));
    }

    #[tokio::test]
    async fn other_rejection_carries_server_message() {
        let mut api = MockAuthApi::new();
        api.expect_register_account()
            .times(1)
            .returning(|_| Ok(ApiResponse::failed("Phone already in use")));
        api.expect_login().times(0);

        let sequencer = RegistrationSequencer::new(Arc::new(api), session());
        let err = sequencer
            .submit(&valid_registration_draft())
            .await
            .unwrap_err();
        assert_eq!(err.notice().message, "Phone already in use");
    }

    #[tokio::test]
    async fn unreachable_backend() {
        let mut api = MockAuthApi::new();
        api.expect_register_account().times(1).returning(|_| {
            Err(ApiError::Status {
                status: 503,
                body: String::new(),
            })
        });
        api.expect_login().times(0);

        let sequencer = RegistrationSequencer::new(Arc::new(api), session());
        let err = sequencer
            .submit(&valid_registration_draft())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Unreachable(_)));
        assert_eq!(err.notice().message, "Unexpected error occurred");
    }

    #[tokio::test]
    async fn invalid_draft_makes_no_calls() {
        let mut api = MockAuthApi::new();
        api.expect_register_account().times(0);
        api.expect_login().times(0);

        let draft = RegistrationDraft {
            name: String::new(),
            ..valid_registration_draft()
        };
        let sequencer = RegistrationSequencer::new(Arc::new(api), session());
        let err = sequencer.submit(&draft).await.unwrap_err();

        let SubmitError::ValidationFailed(errors) = err else {
            panic!("expected validation failure, got {err:?}");
        };
        assert_eq!(errors.get(RegistrationField::Name), Some("Name is required"));
    }

    #[tokio::test]
    async fn submit_form_writes_errors_back() {
        let mut api = MockAuthApi::new();
        api.expect_register_account().times(0);

        let sequencer = RegistrationSequencer::new(Arc::new(api), session());
        let mut form = RegistrationForm::new();
        let err = sequencer.submit_form(&mut form).await.unwrap_err();

        assert!(matches!(err, SubmitError::ValidationFailed(_)));
        assert!(form.errors().contains(RegistrationField::Name));
        assert!(form.errors().contains(RegistrationField::CropTypes));
    }

    #[tokio::test]
    async fn submit_form_resets_after_success() {
        let mut api = MockAuthApi::new();
        api.expect_register_account()
            .times(1)
            .returning(|_| Ok(ApiResponse::ok("", None)));
        api.expect_login()
            .times(1)
            .returning(|_| tokens(Some(token_for_role("farmer"))));

        let sequencer = RegistrationSequencer::new(Arc::new(api), session());
        let mut form = RegistrationForm::from_draft(valid_registration_draft());
        let done = sequencer.submit_form(&mut form).await.unwrap();

        assert_eq!(done.message, DEFAULT_SUCCESS_MESSAGE);
        assert!(form.draft().name.is_empty());
        assert!(form.errors().is_empty());
    }

    /// Holds `register_account` open until released
    #[derive(Default)]
    struct GatedApi {
        entered: Notify,
        release: Notify,
        logins: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl AuthApi for GatedApi {
        async fn register_account(
            &self,
            _payload: &RegisterPayload,
        ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
            self.entered.notify_one();
            self.release.notified().await;
            registered()
        }

        async fn login(
            &self,
            _credentials: &LoginPayload,
        ) -> Result<ApiResponse<LoginData>, ApiError> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            tokens(Some(token_for_role("farmer")))
        }

        async fn refresh_access_token(
            &self,
            _refresh_token: &str,
        ) -> Result<ApiResponse<LoginData>, ApiError> {
            Ok(ApiResponse::failed("not used"))
        }
    }

    #[tokio::test]
    async fn overlapping_submit_is_refused() {
        let api = Arc::new(GatedApi::default());
        let sequencer = Arc::new(RegistrationSequencer::new(api.clone(), session()));

        let first = tokio::spawn({
            let sequencer = sequencer.clone();
            let draft = valid_registration_draft();
            async move { sequencer.submit(&draft).await }
        });
        api.entered.notified().await;
        assert!(sequencer.is_in_flight());

        let err = sequencer
            .submit(&valid_registration_draft())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::AlreadyInFlight));
        assert_eq!(err.notice().level, crate::notice::NoticeLevel::Info);

        api.release.notify_one();
        let done = first.await.unwrap();
        assert!(done.is_ok());
        assert_eq!(api.logins.load(Ordering::SeqCst), 1);
        assert!(!sequencer.is_in_flight());

        assert!(sequencer.session().is_logged_in());
    }
}
