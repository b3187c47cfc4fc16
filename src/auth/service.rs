use std::sync::Arc;
use tracing::{info, warn};
use crate::auth::password::{check_password_length, hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::db::models::{Account, NewAccount};
use crate::db::operations::DbOperations;
use crate::error::{AppError, AuthError, DatabaseError};

/// Emails are compared case-insensitively by storing them lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account registration, lookup and credential checks.
pub struct AuthService {
    db: DbOperations,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
    // Verified against when the email is unknown, so both login failures
    // take the same path.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(db: DbOperations, tokens: Arc<TokenService>, bcrypt_cost: u32) -> Result<Self, AppError> {
        let dummy_hash = hash_password("dummy-password", bcrypt_cost)?;
        Ok(Self {
            db,
            tokens,
            bcrypt_cost,
            dummy_hash,
        })
    }

    pub async fn register(&self, new_account: NewAccount) -> Result<Account, AppError> {
        check_password_length(&new_account.password)?;

        let account = Account {
            email: normalize_email(&new_account.email),
            first_name: new_account.first_name,
            last_name: new_account.last_name,
            password_hash: hash_password(&new_account.password, self.bcrypt_cost)?,
        };

        match self.db.create_account(&account).await {
            Ok(account) => {
                info!("Registered account {}", account.email);
                Ok(account)
            }
            Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
                warn!("Registration rejected, email already in use: {}", account.email);
                Err(AuthError::DuplicateEmail.into())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        self.db.get_account_by_email(&normalize_email(email)).await
    }

    pub fn verify_password(&self, account: &Account, plaintext: &str) -> bool {
        verify_password(plaintext, &account.password_hash)
    }

    /// Checks credentials and issues a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let verified = match self.find_by_email(email).await? {
            Some(account) => self.verify_password(&account, password).then_some(account),
            None => {
                let _ = verify_password(password, &self.dummy_hash);
                None
            }
        };

        match verified {
            Some(account) => self.tokens.issue(&account.email),
            None => Err(AuthError::LoginFailed.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use chrono::Duration;

    async fn setup() -> AuthService {
        let db = DbOperations::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        let tokens = Arc::new(TokenService::new("test_secret", Duration::hours(1)));
        AuthService::new(db, tokens, crate::auth::MIN_BCRYPT_COST).unwrap()
    }

    fn alice(email: &str, password: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let auth = setup().await;
        let account = auth.register(alice("alice@example.com", "password123")).await.unwrap();
        assert_ne!(account.password_hash, "password123");
        assert!(auth.verify_password(&account, "password123"));
        assert!(!auth.verify_password(&account, "wrong"));
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first_account() {
        let auth = setup().await;
        auth.register(alice("alice@example.com", "password123")).await.unwrap();

        let mut second = alice("ALICE@example.com", "other-password");
        second.first_name = "Mallory".to_string();
        let err = auth.register(second).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::DuplicateEmail)));

        let stored = auth.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Alice");
        assert!(auth.verify_password(&stored, "password123"));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = setup().await;
        auth.register(alice("alice@example.com", "password123")).await.unwrap();

        let wrong_password = auth.login("alice@example.com", "nope").await.unwrap_err();
        let unknown_email = auth.login("nobody@example.com", "password123").await.unwrap_err();
        assert!(matches!(wrong_password, AppError::AuthError(AuthError::LoginFailed)));
        assert!(matches!(unknown_email, AppError::AuthError(AuthError::LoginFailed)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_overlong_password_rejected() {
        let auth = setup().await;
        let err = auth
            .register(alice("alice@example.com", &"x".repeat(75)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(auth.find_by_email("alice@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mixed_case_login() {
        let auth = setup().await;
        let account = auth.register(alice("Alice@Example.com", "password123")).await.unwrap();
        assert_eq!(account.email, "alice@example.com");

        let token = auth.login("ALICE@EXAMPLE.COM", "password123").await.unwrap();
        assert_eq!(auth.tokens.validate(&token).unwrap().email, "alice@example.com");
    }
}
