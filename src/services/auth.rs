//! Authentication service: credential checks and JWT handling
//!
//! Provides:
//! - Login against a pluggable [CredentialVerifier]
//! - Signed, stateless access tokens carrying `{username, id}`
//! - Resolution of the current user from an `Authorization` header

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::{Database, UserRecord};
use crate::error::CatalogError;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Username at issue time
    pub username: String,
    /// User ID
    pub id: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

// ============================================================================
// Credentials
// ============================================================================

/// Decides whether a password is valid for a user
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, user: &UserRecord, password: &str) -> bool;
}

/// Accepts one shared password for every user.
///
/// Users have no stored password, so this is the only verifier the catalog
/// ships. Anything stronger plugs in through [CredentialVerifier].
#[derive(Debug, Clone)]
pub struct SharedPasswordVerifier {
    password: String,
}

impl SharedPasswordVerifier {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for SharedPasswordVerifier {
    async fn verify(&self, _user: &UserRecord, password: &str) -> bool {
        password == self.password
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_lifetime_secs: i64,
}

impl AuthConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime_secs: config.token_lifetime_secs,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
    credentials: Arc<dyn CredentialVerifier>,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig, credentials: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            db,
            config,
            credentials,
        }
    }

    /// Create a service that checks logins against one shared password
    pub fn with_shared_password(
        db: Database,
        config: AuthConfig,
        password: impl Into<String>,
    ) -> Self {
        Self::new(db, config, Arc::new(SharedPasswordVerifier::new(password)))
    }

    /// Login with username and password, returning a signed token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, CatalogError> {
        let user = self
            .db
            .users()
            .get_by_username(username)
            .await?
            .ok_or_else(|| CatalogError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !self.credentials.verify(&user, password).await {
            return Err(CatalogError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        self.issue_token(&user)
    }

    /// Sign a token for the given user
    pub fn issue_token(&self, user: &UserRecord) -> Result<String, CatalogError> {
        let now = Utc::now();
        let claims = TokenClaims {
            username: user.username.clone(),
            id: user.id.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.token_lifetime_secs)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| CatalogError::Internal(format!("Failed to create token: {e}")))
    }

    /// Verify a token's signature and expiry, returning its claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, CatalogError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            CatalogError::Authentication(format!("Invalid token: {e}"))
        })
    }

    /// Resolve the user behind an `Authorization` header value.
    ///
    /// No header, or a scheme other than bearer, means an anonymous request.
    /// A bearer token that fails verification is an error. A valid token whose
    /// user no longer exists is treated as anonymous.
    pub async fn resolve_current_user(
        &self,
        authorization: Option<&str>,
    ) -> Result<Option<UserRecord>, CatalogError> {
        let Some(token) = authorization.and_then(bearer_token) else {
            return Ok(None);
        };

        let claims = self.verify(token)?;
        let user = self.db.users().get_by_id(&claims.id).await?;
        if user.is_none() {
            tracing::debug!(user_id = %claims.id, "Token refers to an unknown user");
        }
        Ok(user)
    }
}

/// Extract the token from a `Bearer <token>` header value (scheme is case-insensitive)
pub fn bearer_token(header: &str) -> Option<&str> {
    const SCHEME: &str = "bearer ";
    header
        .get(..SCHEME.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(SCHEME))
        .map(|_| header[SCHEME.len()..].trim())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::db::CreateUser;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_lifetime_secs: 3600,
        }
    }

    async fn service_with_alice() -> (AuthService, UserRecord) {
        let db = Database::in_memory().await.unwrap();
        let alice = db
            .users()
            .create(CreateUser {
                username: "alice".to_string(),
                favourite_genre: "fantasy".to_string(),
            })
            .await
            .unwrap();
        (AuthService::with_shared_password(db, test_config(), "secret"), alice)
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bear"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let (auth, alice) = service_with_alice().await;
        let token = auth.login("alice", "secret").await.unwrap();

        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.id, alice.id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (auth, _) = service_with_alice().await;
        assert_matches!(
            auth.login("alice", "wrong").await,
            Err(CatalogError::Authentication(msg)) if msg == INVALID_CREDENTIALS
        );
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let (auth, _) = service_with_alice().await;
        assert_matches!(
            auth.login("mallory", "secret").await,
            Err(CatalogError::Authentication(_))
        );
    }

    #[tokio::test]
    async fn test_verify_rejects_foreign_signature() {
        let (auth, alice) = service_with_alice().await;
        let other = AuthService::with_shared_password(
            Database::in_memory().await.unwrap(),
            AuthConfig {
                jwt_secret: "another-secret".to_string(),
                token_lifetime_secs: 3600,
            },
            "secret",
        );
        let token = other.issue_token(&alice).unwrap();
        assert_matches!(auth.verify(&token), Err(CatalogError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_token() {
        let (auth, alice) = service_with_alice().await;
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            username: alice.username.clone(),
            id: alice.id.clone(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_matches!(auth.verify(&token), Err(CatalogError::Authentication(msg)) if msg.contains("Expired"));
    }

    #[tokio::test]
    async fn test_resolve_current_user_round_trip() {
        let (auth, alice) = service_with_alice().await;
        let token = auth.login("alice", "secret").await.unwrap();

        let header = format!("Bearer {token}");
        let user = auth.resolve_current_user(Some(&header)).await.unwrap();
        assert_eq!(user.map(|u| u.id), Some(alice.id));
    }

    #[tokio::test]
    async fn test_resolve_current_user_anonymous() {
        let (auth, _) = service_with_alice().await;
        assert_eq!(auth.resolve_current_user(None).await.unwrap(), None);
        assert_eq!(
            auth.resolve_current_user(Some("Basic abc")).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_resolve_current_user_malformed_token() {
        let (auth, _) = service_with_alice().await;
        assert_matches!(
            auth.resolve_current_user(Some("Bearer not-a-token")).await,
            Err(CatalogError::Authentication(_))
        );
    }

    #[tokio::test]
    async fn test_resolve_current_user_unknown_id_is_anonymous() {
        let (auth, _) = service_with_alice().await;
        let ghost = UserRecord {
            id: "00000000-0000-0000-0000-000000000000".to_string(),
            username: "ghost".to_string(),
            favourite_genre: "horror".to_string(),
            created_at: String::new(),
        };
        let token = auth.issue_token(&ghost).unwrap();
        let header = format!("Bearer {token}");
        assert_eq!(auth.resolve_current_user(Some(&header)).await.unwrap(), None);
    }
}
