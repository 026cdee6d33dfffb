//! Application services

pub mod auth;
pub mod logging;

pub use auth::{
    AuthConfig, AuthService, CredentialVerifier, SharedPasswordVerifier, TokenClaims, bearer_token,
};
pub use logging::init_tracing;
