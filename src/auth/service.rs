use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, decode, Header, EncodingKey, DecodingKey, Validation, Algorithm};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::config::AuthConfig;
use crate::error::{AppError, AuthError};
use crate::store::{CredentialStore, User, UserProfile};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub iat: i64,     // Issued at
    pub exp: i64,     // Expiration time
}

/// Registration, login and token verification over an injected store.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<UserProfile, AppError> {
        if username.is_empty() {
            return Err(AppError::ValidationError("Username must not be empty".into()));
        }

        // Cheap early rejection before paying for a hash.
        if self.store.exists(username).await? {
            return Err(AuthError::UsernameTaken.into());
        }

        let password_hash = hash_password(password.to_string(), self.config.bcrypt_cost).await?;
        let user = User::new(username, password_hash);
        let profile = user.profile();

        if !self.store.insert_if_absent(user).await? {
            warn!("Lost registration race for username: {}", username);
            return Err(AuthError::UsernameTaken.into());
        }

        info!("Registered user: {}", username);
        Ok(profile)
    }

    /// Verify the password and issue a signed access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self.store.find(username).await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password.to_string(), user.password_hash).await? {
            warn!("Wrong password for username: {}", username);
            return Err(AuthError::WrongPassword.into());
        }

        let token = self.generate_token(username)?;
        info!("Issued access token for username: {}", username);
        Ok(token)
    }

    /// Check the signature and expiry of `token` and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(data.claims)
    }

    fn generate_token(&self, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = Duration::try_minutes(self.config.token_expiry_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "token expiry of {} minutes is out of range",
                    self.config.token_expiry_minutes
                ))
            })?
            .timestamp();
        let claims = Claims {
            username: username.to_string(),
            iat: now.timestamp(),
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalError(format!("token signing failed: {}", e)))
    }
}
