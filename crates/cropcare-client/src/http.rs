//! reqwest implementation of `AuthApi`

use crate::api::{
    ApiResponse, AuthApi, LoginData, LoginPayload, RegisterPayload, LOGIN_PATH,
    REFRESH_TOKEN_PATH, REGISTER_FARMER_PATH,
};
use crate::config::ClientConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, COOKIE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Cookie name the backend reads the refresh token from
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// HTTP client for the CropCare backend
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    config: ClientConfig,
}

impl HttpAuthApi {
    /// Create client with the configured timeout
    ///
    /// # Errors
    /// Fails if the underlying TLS backend cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "POST");
        self.client.post(url).header(CACHE_CONTROL, "no-store")
    }

    /// Send and read the envelope
    ///
    /// A non-success status whose body is still an envelope is returned as
    /// that envelope; the caller decides what `success: false` means.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => {
                if !status.is_success() {
                    tracing::warn!(status = status.as_u16(), message = %envelope.message, "backend refused request");
                }
                Ok(envelope)
            }
            Err(e) if status.is_success() => Err(ApiError::Decode(e)),
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn register_account(
        &self,
        payload: &RegisterPayload,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.send(self.post(REGISTER_FARMER_PATH).json(payload)).await
    }

    async fn login(&self, credentials: &LoginPayload) -> Result<ApiResponse<LoginData>, ApiError> {
        self.send(self.post(LOGIN_PATH).json(credentials)).await
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<ApiResponse<LoginData>, ApiError> {
        let cookie = format!("{REFRESH_TOKEN_COOKIE}={refresh_token}");
        self.send(self.post(REFRESH_TOKEN_PATH).header(COOKIE, cookie))
            .await
    }
}
