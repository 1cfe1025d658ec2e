//! ApiClient：资源服务消费的适配器契约（get / post / put / delete）
//!
//! - 有访问令牌时自动附加 `Authorization: Bearer`
//! - 非 `/auth/*` 请求收到 401 且持有刷新令牌时，调用一次 `/auth/refresh` 并透明重试原请求
//! - 刷新失败通知 CredentialSource 会话不可恢复（由其清空令牌并切回匿名态），返回原始 401 错误
//! - 请求发出后会话代数变化（登出、重新登录）时丢弃响应，不把旧会话的数据交给调用方

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{ApiError, ApiRequest, ApiResponse, ErrorKind, Method, QueryPairs, Transport};
use crate::types::TokenRefreshResponse;

/// 刷新访问令牌的端点
pub const REFRESH_PATH: &str = "/auth/refresh";

/// 请求期间会话已结束
pub const SESSION_ENDED: &str = "Session ended before the request completed";

/// 令牌来源：适配器只读取令牌，刷新结果回写给会话层
///
/// generation 每次更换或丢弃令牌对时递增；回调带上发起时的代数，代数不符的结果一律作废。
pub trait CredentialSource: Send + Sync {
    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    fn generation(&self) -> u64;

    /// 透明刷新成功；返回 false 表示会话已在刷新期间结束，新令牌被丢弃
    fn on_token_refreshed(&self, generation: u64, access_token: &str) -> bool;

    /// 刷新失败，会话不可恢复
    fn on_session_expired(&self, generation: u64);
}

/// 适配器：持有传输层与令牌来源；Clone 廉价（内部 Arc）
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: Option<Arc<dyn CredentialSource>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: QueryPairs) -> Result<T, ApiError> {
        let request = ApiRequest::new(Method::Get, path).with_query(query);
        decode(self.execute(request).await?)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::new(Method::Post, path).with_body(encode(body)?);
        decode(self.execute(request).await?)
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::new(Method::Put, path).with_body(encode(body)?);
        decode(self.execute(request).await?)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = ApiRequest::new(Method::Delete, path);
        decode(self.execute(request).await?)
    }

    async fn execute(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        let Some(credentials) = self.credentials.as_ref() else {
            let response = self.transport.send(request).await?;
            return settle(response);
        };

        let generation = credentials.generation();
        request.bearer = credentials.access_token();
        let response = self.transport.send(request.clone()).await?;
        if request.bearer.is_some() && credentials.generation() != generation {
            tracing::info!(path = %request.path, "session changed while request was in flight, dropping response");
            return Err(ApiError::new(ErrorKind::Unauthorized, SESSION_ENDED));
        }
        if response.is_success() {
            return Ok(response.body);
        }

        let error = ApiError::from_response(response.status, &response.body);
        if !error.is_unauthorized() || request.path.starts_with("/auth/") {
            return Err(error);
        }
        let Some(refresh_token) = credentials.refresh_token() else {
            return Err(error);
        };

        tracing::info!(path = %request.path, "access token rejected, refreshing");
        match self.refresh_access(&refresh_token).await {
            Ok(access_token) => {
                if !credentials.on_token_refreshed(generation, &access_token) {
                    tracing::info!("session ended during refresh, discarding new token");
                    return Err(error);
                }
                request.bearer = Some(access_token);
                let retried = self.transport.send(request).await?;
                if credentials.generation() != generation {
                    return Err(ApiError::new(ErrorKind::Unauthorized, SESSION_ENDED));
                }
                settle(retried)
            }
            Err(e) => {
                tracing::warn!("token refresh failed: {}", e);
                credentials.on_session_expired(generation);
                Err(error)
            }
        }
    }

    async fn refresh_access(&self, refresh_token: &str) -> Result<String, ApiError> {
        let request = ApiRequest::new(Method::Post, REFRESH_PATH)
            .with_body(serde_json::json!({ "refresh_token": refresh_token }));
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::from_response(response.status, &response.body));
        }
        let refreshed: TokenRefreshResponse = decode(response.body)?;
        Ok(refreshed.access_token)
    }
}

fn settle(response: ApiResponse) -> Result<Value, ApiError> {
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(ApiError::from_response(response.status, &response.body))
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::invalid_params(format!("Unserializable request body: {}", e)))
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(ApiError::decode)
}
