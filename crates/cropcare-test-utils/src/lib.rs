//! Testing utilities for the CropCare workspace
//!
//! Shared drafts and unsigned access tokens.

#![allow(missing_docs)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use cropcare_forms::{CropKind, RegistrationDraft, SignInDraft};
use serde_json::{json, Value};

pub const FARMER_EMAIL: &str = "abdul@x.com";
pub const FARMER_PASSWORD: &str = "secret1";

/// Minimal draft that passes validation
pub fn valid_registration_draft() -> RegistrationDraft {
    RegistrationDraft {
        name: "Abdul".to_string(),
        email: FARMER_EMAIL.to_string(),
        password: FARMER_PASSWORD.to_string(),
        confirm_password: FARMER_PASSWORD.to_string(),
        crop_types: vec![CropKind::Rice],
        ..Default::default()
    }
}

/// Draft with every optional field populated
pub fn full_registration_draft() -> RegistrationDraft {
    RegistrationDraft {
        phone: Some("01712345678".to_string()),
        address: Some("Bogura Sadar".to_string()),
        photo: Some("https://cdn.example.com/abdul.png".to_string()),
        crop_types: vec![CropKind::Rice, CropKind::Potato],
        farm_size: Some(2.5),
        farming_experience: Some(12),
        farm_location: Some("Bogura".to_string()),
        soil_type: Some(cropcare_forms::SoilType::Loamy),
        irrigation_type: Some(cropcare_forms::IrrigationType::Drip),
        ..valid_registration_draft()
    }
}

pub fn valid_sign_in_draft() -> SignInDraft {
    SignInDraft::new(FARMER_EMAIL, FARMER_PASSWORD)
}

/// Unsigned JWT carrying the given payload
pub fn make_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

/// Token for `role` that expires far in the future
pub fn token_for_role(role: &str) -> String {
    make_token(&json!({
        "id": "user-1",
        "email": format!("{}@example.com", role.to_lowercase()),
        "role": role,
        "iat": 1_700_000_000_i64,
        "exp": 4_102_444_800_i64,
    }))
}

/// Token for `role` whose `exp` is in the past
pub fn expired_token_for_role(role: &str) -> String {
    make_token(&json!({
        "id": "user-1",
        "email": format!("{}@example.com", role.to_lowercase()),
        "role": role,
        "iat": 1_600_000_000_i64,
        "exp": 1_600_000_900_i64,
    }))
}
