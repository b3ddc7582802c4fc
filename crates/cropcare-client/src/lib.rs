//! CropCare Client - backend sequencing and session context
//!
//! Connects the dashboard forms to the CropCare backend:
//! - Configuration from a builder or `CROPCARE_*` environment variables
//! - The `AuthApi` seam and its reqwest implementation
//! - Register-then-login submission with one notice per failure kind
//! - Sign-in, token refresh and role-based routing
//! - An explicit `SessionContext` with init/teardown lifecycle
//!
//! # Example
//!
//! ```rust,no_run
//! use cropcare_client::{ClientConfig, HttpAuthApi, RegistrationSequencer, SessionContext};
//! use cropcare_forms::{CropKind, RegistrationDraft};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let session = Arc::new(SessionContext::in_memory(&config));
//! let api = Arc::new(HttpAuthApi::new(config)?);
//! let sequencer = RegistrationSequencer::new(api, session);
//!
//! let draft = RegistrationDraft {
//!     name: "Abdul".to_string(),
//!     email: "abdul@x.com".to_string(),
//!     password: "secret1".to_string(),
//!     confirm_password: "secret1".to_string(),
//!     crop_types: vec![CropKind::Rice],
//!     ..Default::default()
//! };
//!
//! match sequencer.submit(&draft).await {
//!     Ok(done) => println!("{} -> {}", done.notice().message, done.route().path()),
//!     Err(e) => println!("{}", e.notice().message),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
mod guard;
pub mod http;
pub mod notice;
pub mod register;
pub mod session;
pub mod sign_in;
pub mod telemetry;

pub use api::{ApiErrorBody, ApiResponse, AuthApi, LoginData, LoginPayload, RegisterPayload};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, SessionError, SignInError, SubmitError};
pub use http::HttpAuthApi;
pub use notice::{Notice, NoticeLevel, Route};
pub use register::{Registered, RegistrationSequencer};
pub use session::{decode_claims, Claims, CredentialStore, MemoryStore, Role, Session, SessionContext};
pub use sign_in::{SignInSequencer, SignedIn};
pub use telemetry::{init_tracing, LogFormat};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for wiring the client
    pub use crate::{
        AuthApi, ClientConfig, HttpAuthApi, Notice, RegistrationSequencer, Route, SessionContext,
        SignInSequencer, SubmitError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
