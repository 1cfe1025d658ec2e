//! 认证服务：login / register / refresh
//!
//! 只做请求翻译，不写任何存储；成功后的令牌由 SessionManager 负责持久化。

use serde::Serialize;

use crate::api::client::REFRESH_PATH;
use crate::api::{ApiClient, ApiError};
use crate::types::{AuthResponse, TokenRefreshResponse};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, data: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client.post("/auth/login", data).await
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.client.post("/auth/register", data).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRefreshResponse, ApiError> {
        self.client
            .post(REFRESH_PATH, &serde_json::json!({ "refresh_token": refresh_token }))
            .await
    }
}
