//! Shared test setup
//!
//! Builds the API router over in-memory stores with a seeded badge
//! generator, plus one admin and one regular user with known
//! credentials.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use confpass::api::{create_router, AppState};
use confpass::auth::{hash_password, AuthService, LoginRequest, RegisterUser};
use confpass::domain::{RandomBadgeIds, User, ROLE_ADMIN};
use confpass::store::Stores;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const USER_EMAIL: &str = "user@example.com";
pub const USER_PASSWORD: &str = "user-pass";

pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
    pub admin_token: String,
    pub user_token: String,
}

pub async fn setup_app() -> TestApp {
    let stores = Stores::in_memory();
    let auth = AuthService::new(&stores);

    // AuthService only mints regular users, so the admin is inserted
    // directly
    let admin = User::new(
        "Admin".to_string(),
        ADMIN_EMAIL.to_string(),
        hash_password(ADMIN_PASSWORD),
        ROLE_ADMIN.to_string(),
    );
    stores.users.insert(&admin).await.unwrap();

    auth.register(RegisterUser {
        name: "User".to_string(),
        email: USER_EMAIL.to_string(),
        password: USER_PASSWORD.to_string(),
    })
    .await
    .unwrap();

    let admin_token = login(&auth, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let user_token = login(&auth, USER_EMAIL, USER_PASSWORD).await;

    let state = AppState::new(stores.clone(), Arc::new(RandomBadgeIds::seeded(42)));

    TestApp {
        router: create_router(state),
        stores,
        admin_token,
        user_token,
    }
}

async fn login(auth: &AuthService, email: &str, password: &str) -> String {
    auth.login(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
    .await
    .unwrap()
    .access_token
}

/// Build a request, optionally with a bearer token and JSON body
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
