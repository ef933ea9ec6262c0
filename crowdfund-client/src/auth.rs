//! Authentication backend client and the login/registration flows.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::{ClientError, Result};
use crate::models::{ErrorDetail, LoginRequest, RegisterRequest, TokenResponse};
use crate::routes::Route;
use crate::session::SessionStore;

pub const LOGIN_FALLBACK_ERROR: &str = "An error occurred during login.";
pub const REGISTRATION_FALLBACK_ERROR: &str = "An error occurred during registration.";

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// `POST /auth/login`, returns the issued token.
    async fn login(&self, request: &LoginRequest) -> Result<String>;

    /// `POST /user`, returns the issued token.
    async fn register(&self, request: &RegisterRequest) -> Result<String>;
}

pub struct HttpAuthBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_for_token<T: serde::Serialize + Sync>(&self, path: &str, body: &T) -> Result<String> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<TokenResponse>().await?.token);
        }
        let body = response.bytes().await?;
        match serde_json::from_slice::<ErrorDetail>(&body) {
            Ok(error) => Err(ClientError::Auth(error.detail)),
            Err(_) => Err(ClientError::Backend(status.as_u16())),
        }
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, request: &LoginRequest) -> Result<String> {
        self.post_for_token("/auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<String> {
        self.post_for_token("/user", request).await
    }
}

/// Submits the login form. On success the session holds the new token and the
/// caller should navigate to the returned route; on failure the returned text
/// is shown inline.
pub async fn submit_login(
    backend: &dyn AuthBackend,
    session: &mut SessionStore,
    request: LoginRequest,
) -> std::result::Result<Route, String> {
    match backend.login(&request).await {
        Ok(token) => {
            session.login(token);
            info!(username = %request.username, "logged in");
            Ok(Route::Home)
        }
        Err(e) => Err(inline_error(e, LOGIN_FALLBACK_ERROR)),
    }
}

pub async fn submit_registration(
    backend: &dyn AuthBackend,
    session: &mut SessionStore,
    request: RegisterRequest,
) -> std::result::Result<Route, String> {
    match backend.register(&request).await {
        Ok(token) => {
            session.login(token);
            info!(username = %request.username, "registered");
            Ok(Route::Login)
        }
        Err(e) => Err(inline_error(e, REGISTRATION_FALLBACK_ERROR)),
    }
}

pub fn logout(session: &mut SessionStore) -> Route {
    session.logout();
    Route::Login
}

fn inline_error(err: ClientError, fallback: &str) -> String {
    warn!("auth request failed: {err}");
    match err {
        ClientError::Auth(detail) => detail,
        _ => fallback.to_string(),
    }
}
