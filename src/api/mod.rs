//! HTTP 客户端适配层：传输抽象、Bearer 令牌附加、401 时单次刷新重试、错误归一化
//!
//! 所有资源服务只依赖 ApiClient；真实网络走 HttpTransport（reqwest），测试与离线演示走 MockTransport。

pub mod client;
pub mod error;
pub mod http;
pub mod mock;
pub mod query;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

pub use client::{ApiClient, CredentialSource};
pub use error::{ApiError, ErrorBody, ErrorKind, ErrorResponse, NETWORK_ERROR};
pub use http::HttpTransport;
pub use mock::{MockGate, MockRoute, MockTransport};
pub use query::{to_query, QueryPairs};

/// HTTP 方法（服务层只用到这四种）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// 一次待发送的请求；path 相对于 base_url（如 `/projects`）
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: QueryPairs,
    pub body: Option<Value>,
    /// Bearer 访问令牌，由 ApiClient 在发送前填入
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn with_query(mut self, query: QueryPairs) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// 查询参数中某个 key 的值
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 原始响应：状态码 + JSON 体（空体为 Null）
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 传输层：只负责把请求发出去并拿回状态码与响应体，不解释业务语义
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}
