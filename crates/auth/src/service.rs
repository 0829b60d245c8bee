use std::sync::Arc;

use hrkit_storage::{doc, Collection, CollectionName, DocumentStore, RecordId, StoreError};

use crate::{
    error::{AuthError, Result},
    jwt::{generate_token, validate_token, Claims},
    model::User,
    password::{hash_password, verify_password, DEFAULT_COST},
};

/// Authentication service: account creation and token issuance
#[derive(Clone)]
pub struct AuthService {
    users: Collection<User>,
    jwt_secret: String,
    token_expiry_seconds: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    /// Create a new AuthService
    ///
    /// # Arguments
    /// * `store` - Document store holding the `users` collection
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_expiry_seconds` - Token expiration time in seconds (default: 3600 for 1 hour)
    pub fn new(store: Arc<dyn DocumentStore>, jwt_secret: String, token_expiry_seconds: i64) -> Self {
        Self {
            users: Collection::new(store, CollectionName::Users),
            jwt_secret,
            token_expiry_seconds,
            bcrypt_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Register a new user and return its id
    ///
    /// # Arguments
    /// * `username` - Unique login name
    /// * `email` - Contact address
    /// * `password` - User's plain text password (will be hashed)
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<RecordId> {
        if self.find_user_by_username(username).await?.is_some() {
            return Err(AuthError::UserExists);
        }

        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::HashingError(e.to_string()))??;

        let user = User::new(username.to_string(), email.to_string(), password_hash);

        // The unique index catches a concurrent signup that passed the check above
        let id = self.users.insert(&user).await.map_err(|e| match e {
            StoreError::Duplicate { .. } => AuthError::UserExists,
            other => AuthError::Store(other),
        })?;

        tracing::info!(user_id = %id, "user signed up");
        Ok(id)
    }

    /// Login a user and return a JWT token
    ///
    /// # Arguments
    /// * `username` - User's login name
    /// * `password` - User's plain text password
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, User)> {
        let user = self
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let candidate = password.to_string();
        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored_hash))
            .await
            .map_err(|_| AuthError::VerificationError)??;

        if !matches {
            tracing::debug!("login rejected: password mismatch");
            return Err(AuthError::InvalidPassword);
        }

        let user_id = user
            .id
            .ok_or_else(|| AuthError::TokenGenerationError("User has no ID".to_string()))?;

        let token = generate_token(&user_id.to_hex(), &self.jwt_secret, self.token_expiry_seconds)?;

        tracing::info!(user_id = %user_id, "user logged in");
        Ok((token, user))
    }

    /// Validate a JWT token and return the user it was issued to
    pub async fn validate(&self, token: &str) -> Result<User> {
        let claims = self.validate_claims(token)?;

        let user_id = RecordId::parse(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Check signature and expiry only
    pub fn validate_claims(&self, token: &str) -> Result<Claims> {
        validate_token(token, &self.jwt_secret)
    }

    /// Find user by username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.find_one(doc! { "username": username }).await?)
    }
}
