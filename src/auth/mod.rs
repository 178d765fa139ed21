//! Auth module
//!
//! Email + password users, salted sha256 password hashes, and opaque
//! bearer tokens. Only token hashes reach the session store, so a dump
//! of it cannot be replayed. Role checks happen in the handlers via
//! `AuthUser::require_admin`.

use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{User, ROLE_USER};
use crate::error::{AppError, AppResult};
use crate::store::{SessionStore, Stores, UserStore};

/// Hash a password with a fresh random salt, producing `salt$digest`
pub fn hash_password(password: &str) -> String {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);
    let digest = digest_password(&salt, password);
    format!("{salt}${digest}")
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, digest)) => digest_password(salt, password) == digest,
        None => false,
    }
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Mint a new opaque bearer token
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a bearer token for session storage and lookup
pub fn token_hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Payload for `POST /auth/register`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Payload for `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            users: stores.users.clone(),
            sessions: stores.sessions.clone(),
        }
    }

    /// Create a new user with the default `user` role
    pub async fn register(&self, input: RegisterUser) -> AppResult<User> {
        if self.users.fetch_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let user = User::new(
            input.name,
            input.email,
            hash_password(&input.password),
            ROLE_USER.to_string(),
        );
        self.users.insert(&user).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verify credentials and mint a bearer token
    pub async fn login(&self, input: LoginRequest) -> AppResult<LoginResponse> {
        let user = self
            .users
            .fetch_by_email(&input.email)
            .await?
            .filter(|user| verify_password(&input.password, &user.password_hash))
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let access_token = generate_token();
        self.sessions
            .insert(&token_hash(&access_token), user.id)
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse { user, access_token })
    }

    /// Resolve a bearer token back to its user
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let user_id = self
            .sessions
            .find_user_id(&token_hash(token))
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        self.users
            .fetch(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))
    }
}
