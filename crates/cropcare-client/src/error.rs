//! Error types for the CropCare client
//!
//! Provides error handling for:
//! - Configuration loading
//! - Backend transport and decoding
//! - Access token decoding
//! - The registration and sign-in sequences

use crate::notice::{Notice, Route};
use cropcare_forms::registration::RegistrationField;
use cropcare_forms::sign_in::SignInField;
use cropcare_forms::FormErrors;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable unset
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),

    /// Backend URL unusable
    #[error("invalid backend url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Timeout not a positive integer
    #[error("invalid request timeout: '{0}'")]
    InvalidTimeout(String),
}

/// Backend call failures below the envelope level
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status without a readable envelope
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Success status but the body is not an envelope
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Access token could not be interpreted
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Not three dot-separated segments
    #[error("malformed token: {0}")]
    MalformedToken(&'static str),

    /// Payload segment is not base64url
    #[error("token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Payload is not the expected JSON
    #[error("token payload is not valid claims: {0}")]
    Claims(#[from] serde_json::Error),

    /// Role claim absent or unknown
    #[error("unrecognised role: {0:?}")]
    UnknownRole(Option<String>),
}

/// Registration submission failures
///
/// Each variant maps to exactly one user-facing notice.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Local validation failed; nothing was sent
    #[error("validation failed for {} field(s)", .0.len())]
    ValidationFailed(FormErrors<RegistrationField>),

    /// Backend already has an account for this email
    #[error("email already registered")]
    DuplicateEmail,

    /// Backend refused the registration
    #[error("registration rejected: {message}")]
    RegistrationRejected { message: String },

    /// Account exists but the follow-up login did not yield a token
    #[error("registered but automatic login failed")]
    PostRegistrationLoginFailed,

    /// Another submission is still running
    #[error("registration already in progress")]
    AlreadyInFlight,

    /// Registration request never got an envelope back
    #[error("backend unreachable: {0}")]
    Unreachable(#[source] ApiError),
}

impl SubmitError {
    /// The notification shown for this failure
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::ValidationFailed(_) => {
                Notice::error("Please fill all required fields correctly")
            }
            Self::DuplicateEmail => {
                Notice::error("This email already registered. Please try another!")
            }
            Self::RegistrationRejected { message } if !message.trim().is_empty() => {
                Notice::error(message.clone())
            }
            Self::RegistrationRejected { .. } => Notice::error("Registration failed."),
            Self::PostRegistrationLoginFailed => Notice::error(
                "Your account was created but we could not sign you in. Please log in.",
            ),
            Self::AlreadyInFlight => Notice::info("Registration is already in progress"),
            Self::Unreachable(_) => Notice::error("Unexpected error occurred"),
        }
    }

    /// Where the user should be sent, if anywhere
    #[must_use]
    pub fn next_route(&self) -> Option<Route> {
        match self {
            Self::PostRegistrationLoginFailed => Some(Route::Login),
            _ => None,
        }
    }
}

/// Sign-in failures
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    /// Local validation failed; nothing was sent
    #[error("validation failed for {} field(s)", .0.len())]
    ValidationFailed(FormErrors<SignInField>),

    /// Backend refused the credentials
    #[error("sign-in rejected: {message}")]
    Rejected { message: String },

    /// Login envelope carried no access token
    #[error("login response carried no access token")]
    MissingToken,

    /// Access token could not be decoded
    #[error("invalid access token: {0}")]
    InvalidToken(#[from] SessionError),

    /// No refresh token stored
    #[error("no refresh token available")]
    NoRefreshToken,

    /// Another sign-in is still running
    #[error("sign-in already in progress")]
    AlreadyInFlight,

    /// Request never got an envelope back
    #[error("backend unreachable: {0}")]
    Unreachable(#[source] ApiError),
}

impl SignInError {
    /// The notification shown for this failure
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::ValidationFailed(_) => Notice::error("Please enter a valid email and password"),
            Self::Rejected { message } if !message.trim().is_empty() => {
                Notice::error(message.clone())
            }
            Self::Rejected { .. } => Notice::error("Login failed."),
            Self::MissingToken | Self::InvalidToken(_) => {
                Notice::error("Login failed. Please try again.")
            }
            Self::NoRefreshToken => Notice::info("Your session has expired. Please log in."),
            Self::AlreadyInFlight => Notice::info("Sign-in is already in progress"),
            Self::Unreachable(_) => Notice::error("Unexpected error occurred"),
        }
    }
}
