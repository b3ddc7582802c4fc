//! Backend wire types and the `AuthApi` seam
//!
//! Every backend reply is wrapped in the same envelope:
//! `{ success, message, data?, error?: { code, details? } }`.

use crate::error::ApiError;
use async_trait::async_trait;
use cropcare_forms::{CropKind, IrrigationType, RegistrationDraft, SignInDraft, SoilType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Register endpoint
pub const REGISTER_FARMER_PATH: &str = "/auth/register/farmer";
/// Login endpoint
pub const LOGIN_PATH: &str = "/auth/login";
/// Token refresh endpoint
pub const REFRESH_TOKEN_PATH: &str = "/auth/refresh-token";

/// Standard response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    pub error: Option<ApiErrorBody>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope
    #[must_use]
    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: None,
        }
    }

    /// Failed envelope
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: None,
        }
    }
}

/// Machine-readable failure detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub details: Option<serde_json::Value>,
}

/// Body of `POST /auth/register/farmer`
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub farmer_profile: FarmerProfilePayload,
}

/// Nested farm profile of a registration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerProfilePayload {
    pub crop_types: Vec<CropKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farming_experience: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<SoilType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irrigation_type: Option<IrrigationType>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl From<&RegistrationDraft> for RegisterPayload {
    fn from(draft: &RegistrationDraft) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            password: draft.password.clone(),
            phone: non_blank(draft.phone.as_ref()),
            address: non_blank(draft.address.as_ref()),
            photo: non_blank(draft.photo.as_ref()),
            farmer_profile: FarmerProfilePayload {
                crop_types: draft.crop_types.clone(),
                farm_size: draft.farm_size,
                farming_experience: draft.farming_experience,
                farm_location: non_blank(draft.farm_location.as_ref()),
                soil_type: draft.soil_type,
                irrigation_type: draft.irrigation_type,
            },
        }
    }
}

impl fmt::Debug for RegisterPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterPayload")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .field("address", &self.address)
            .field("photo", &self.photo)
            .field("farmer_profile", &self.farmer_profile)
            .finish()
    }
}

/// Body of `POST /auth/login`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

impl LoginPayload {
    /// Create login body
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl From<&SignInDraft> for LoginPayload {
    fn from(draft: &SignInDraft) -> Self {
        Self::new(draft.email.trim(), draft.password.clone())
    }
}

impl fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginPayload")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `data` of a login or refresh reply
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl LoginData {
    /// Access token, if present and non-empty
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Refresh token, if present and non-empty
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for LoginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginData")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Backend authentication endpoints
///
/// `Err` means no envelope came back at all; a refusal arrives as
/// `Ok` with `success == false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create a farmer account
    async fn register_account(
        &self,
        payload: &RegisterPayload,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError>;

    /// Exchange credentials for tokens
    async fn login(&self, credentials: &LoginPayload) -> Result<ApiResponse<LoginData>, ApiError>;

    /// Exchange a refresh token for a new access token
    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<ApiResponse<LoginData>, ApiError>;
}
