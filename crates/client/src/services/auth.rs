//! Authentication service.

use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::models::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, User};

/// Typed wrapper over the auth endpoints.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged; a 401 means wrong
    /// credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };

        self.api
            .post::<LoginResponse, _>("auth/login", &request)
            .await?
            .require_data("auth/login")
    }

    /// Register a new merchant.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged; a 422 carries the
    /// per-field error list.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.api
            .post::<User, _>("auth/register", request)
            .await?
            .require_data("auth/register")
    }

    /// Invalidate the session on the server.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged. The session store
    /// treats this as best-effort: local cleanup proceeds either way.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api.post_empty::<serde_json::Value>("auth/logout").await?;
        Ok(())
    }

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginResponse, ApiError> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_owned(),
        };

        self.api
            .post::<LoginResponse, _>("auth/refresh", &request)
            .await?
            .require_data("auth/refresh")
    }
}
