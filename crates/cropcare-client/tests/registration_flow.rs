//! Register-then-login end to end over HTTP

use cropcare_client::{
    ClientConfig, CredentialStore, HttpAuthApi, MemoryStore, RegistrationSequencer, Role, Route,
    SessionContext, SignInSequencer, SubmitError,
};
use cropcare_forms::{CropKind, RegistrationField, RegistrationForm};
use cropcare_test_utils::{token_for_role, valid_registration_draft, valid_sign_in_draft};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    server: MockServer,
    cookies: Arc<MemoryStore>,
    storage: Arc<MemoryStore>,
    session: Arc<SessionContext>,
    api: Arc<HttpAuthApi>,
}

async fn harness() -> Harness {
    cropcare_client::init_tracing();
    let server = MockServer::start().await;
    let config = ClientConfig::new(server.uri()).unwrap();
    let cookies = Arc::new(MemoryStore::new());
    let storage = Arc::new(MemoryStore::new());
    let session = Arc::new(SessionContext::new(
        cookies.clone(),
        storage.clone(),
        config.auth_key(),
    ));
    let api = Arc::new(HttpAuthApi::new(config).unwrap());
    Harness {
        server,
        cookies,
        storage,
        session,
        api,
    }
}

fn registered() -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "success": true,
        "message": "Farmer registered successfully"
    }))
}

#[tokio::test]
async fn registers_then_signs_in() {
    let h = harness().await;
    let token = token_for_role("FARMER");
    Mock::given(method("POST"))
        .and(path("/auth/register/farmer"))
        .respond_with(registered())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({ "email": "abdul@x.com", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "data": { "accessToken": token.clone(), "refreshToken": "refresh-1" }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let sequencer = RegistrationSequencer::new(h.api.clone(), h.session.clone());
    let mut form = RegistrationForm::from_draft(valid_registration_draft());
    let done = sequencer.submit_form(&mut form).await.unwrap();

    assert_eq!(done.notice().message, "Farmer registered successfully");
    assert_eq!(done.route(), Route::Home);
    assert_eq!(h.storage.get("accessToken"), Some(token.clone()));
    assert_eq!(h.session.landing_route(), Route::FarmerDashboard);
    assert!(form.draft().crop_types.is_empty());
}

#[tokio::test]
async fn duplicate_email_stops_before_login() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/auth/register/farmer"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "message": "Duplicate entry found"
        })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let sequencer = RegistrationSequencer::new(h.api.clone(), h.session.clone());
    let mut form = RegistrationForm::from_draft(valid_registration_draft());
    let err = sequencer.submit_form(&mut form).await.unwrap_err();

    assert!(matches!(err, SubmitError::DuplicateEmail));
    assert_eq!(
        err.notice().message,
        "This email already registered. Please try another!"
    );
    assert_eq!(form.draft().crop_types, vec![CropKind::Rice]);
    assert!(!h.session.is_logged_in());
}

#[tokio::test]
async fn tokenless_login_routes_to_manual_login() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/auth/register/farmer"))
        .respond_with(registered())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "data": {}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let sequencer = RegistrationSequencer::new(h.api.clone(), h.session.clone());
    let err = sequencer
        .submit(&valid_registration_draft())
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::PostRegistrationLoginFailed));
    assert_eq!(err.next_route().map(|r| r.path()), Some("/login"));
    assert!(h.cookies.is_empty());
}

#[tokio::test]
async fn invalid_form_sends_nothing() {
    let h = harness().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let sequencer = RegistrationSequencer::new(h.api.clone(), h.session.clone());
    let mut form = RegistrationForm::from_draft(valid_registration_draft());
    form.set_field(RegistrationField::ConfirmPassword, "secret2")
        .unwrap();
    let err = sequencer.submit_form(&mut form).await.unwrap_err();

    assert!(matches!(err, SubmitError::ValidationFailed(_)));
    assert_eq!(
        form.errors().get(RegistrationField::ConfirmPassword),
        Some("Passwords don't match")
    );
    assert_eq!(form.errors().len(), 1);
}

#[tokio::test]
async fn sign_in_then_sign_out() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "data": { "accessToken": token_for_role("farmer"), "refreshToken": "refresh-1" }
        })))
        .mount(&h.server)
        .await;

    let sequencer = SignInSequencer::new(h.api.clone(), h.session.clone());
    let signed_in = sequencer.sign_in(&valid_sign_in_draft()).await.unwrap();
    assert_eq!(signed_in.role, Role::Farmer);
    assert_eq!(signed_in.route.path(), "/dashboard/farmer");

    let restored = h.session.init().unwrap();
    assert_eq!(restored.role(), Role::Farmer);

    assert_eq!(h.session.sign_out(), Route::Home);
    assert!(h.cookies.is_empty());
    assert!(h.storage.is_empty());
}
