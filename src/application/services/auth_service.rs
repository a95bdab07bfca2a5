//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::CurrentUser;
use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;
use crate::utils::code_generator::generate_token;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Service for authenticating API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - token repository for DB operations
    /// - `signing_secret` - HMAC key; must match the value used when tokens were issued
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes()).map_err(|e| {
            AppError::internal("Invalid signing secret", json!({ "reason": e.to_string() }))
        })?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Resolves a raw bearer token to the user it was issued for.
    ///
    /// On success the token's `last_used_at` is refreshed; a failure to record
    /// that is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AppError> {
        let token_hash = self.hash_token(token)?;

        let owner = self
            .repository
            .find_owner(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Invalid or revoked token"}),
                )
            })?;

        let _ = self.repository.update_last_used(&token_hash).await;

        Ok(CurrentUser::new(owner))
    }

    /// Issues a token for `owner` and stores its hash.
    ///
    /// When `raw_token` is `None` a random 48-character token is generated.
    /// Returns the stored record together with the raw token, which cannot be
    /// recovered later.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `owner` or `name` is blank.
    /// Returns [`AppError::Conflict`] if the name or token is already in use.
    pub async fn issue_token(
        &self,
        owner: &str,
        name: &str,
        raw_token: Option<String>,
    ) -> Result<(ApiToken, String), AppError> {
        if owner.trim().is_empty() || name.trim().is_empty() {
            return Err(AppError::bad_request(
                "Owner and token name must not be empty",
                json!({}),
            ));
        }

        let raw_token = raw_token.unwrap_or_else(generate_token);
        let token_hash = self.hash_token(&raw_token)?;

        let stored = self
            .repository
            .create_token(owner.trim(), name.trim(), &token_hash)
            .await?;

        Ok((stored, raw_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTokenRepository;
    use chrono::Utc;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn compute_expected_hash(token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(test_secret().as_bytes()).unwrap();
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut mock_repo = MockTokenRepository::new();

        let token = "valid-token";
        let expected_hash = compute_expected_hash(token);

        mock_repo
            .expect_find_owner()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|_| Ok(Some("alice".to_string())));

        mock_repo
            .expect_update_last_used()
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let user = service.authenticate(token).await.unwrap();

        assert_eq!(user, CurrentUser::new("alice"));
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let mut mock_repo = MockTokenRepository::new();

        mock_repo
            .expect_find_owner()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_update_last_used().times(0);

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let result = service.authenticate("invalid-token").await;

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_ignores_last_used_failure() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo
            .expect_find_owner()
            .returning(|_| Ok(Some("alice".to_string())));
        mock_repo
            .expect_update_last_used()
            .returning(|_| Err(AppError::store_unavailable("Database error", json!({}))));

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        assert!(service.authenticate("token").await.is_ok());
    }

    #[tokio::test]
    async fn test_issue_token_stores_hash_not_raw_value() {
        let mut mock_repo = MockTokenRepository::new();
        let expected_hash = compute_expected_hash("chosen-token");

        mock_repo
            .expect_create_token()
            .withf(move |owner, name, hash| {
                owner == "alice" && name == "laptop" && hash == expected_hash
            })
            .times(1)
            .returning(|owner, name, hash| {
                Ok(ApiToken {
                    id: 1,
                    owner: owner.to_string(),
                    name: name.to_string(),
                    token_hash: hash.to_string(),
                    created_at: Utc::now(),
                    last_used_at: None,
                    revoked_at: None,
                })
            });

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let (stored, raw) = service
            .issue_token("alice", "laptop", Some("chosen-token".to_string()))
            .await
            .unwrap();

        assert_eq!(raw, "chosen-token");
        assert_ne!(stored.token_hash, raw);
    }

    #[tokio::test]
    async fn test_issue_token_rejects_blank_owner() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo.expect_create_token().times(0);

        let service = AuthService::new(Arc::new(mock_repo), test_secret());

        let result = service.issue_token("  ", "laptop", None).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_hash_token_consistency() {
        let service = AuthService::new(Arc::new(MockTokenRepository::new()), test_secret());

        let hash1 = service.hash_token("test-token").unwrap();
        let hash2 = service.hash_token("test-token").unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[tokio::test]
    async fn test_hash_token_secret_matters() {
        let svc1 = AuthService::new(Arc::new(MockTokenRepository::new()), "secret-a".to_string());
        let svc2 = AuthService::new(Arc::new(MockTokenRepository::new()), "secret-b".to_string());

        assert_ne!(
            svc1.hash_token("token").unwrap(),
            svc2.hash_token("token").unwrap()
        );
    }
}
