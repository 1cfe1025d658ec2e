//! 适配器错误：网络、服务端业务错误、认证失败统一归一为同一结构
//!
//! 对应服务端错误包 `{ "error": { "message", "code"?, "details"? } }`；Display 只输出 message，供 UI 直接展示。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// 网络层失败时的统一提示（UI 直接展示）
pub const NETWORK_ERROR: &str = "Network Error";

/// 错误分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// 连接失败、超时等传输层错误
    Network,
    /// 服务端返回非 2xx（校验失败、未找到、冲突等）
    Http { status: u16 },
    /// 401：令牌过期或无效
    Unauthorized,
    /// 2xx 但响应体无法解析为目标类型
    Decode,
    /// 请求参数未通过本地校验，未发出请求
    InvalidParams,
}

/// 线上错误对象 `error: { message, code?, details? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// 错误响应包 `{ "error": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// 归一化后的适配器错误
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub code: Option<String>,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            details: None,
        }
    }

    pub fn network(cause: impl std::fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: NETWORK_ERROR.to_string(),
            code: None,
            details: Some(serde_json::json!({ "cause": cause.to_string() })),
        }
    }

    pub fn decode(cause: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::Decode, format!("Invalid response body: {}", cause))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParams, message)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind, ErrorKind::Unauthorized)
    }

    /// 根据状态码与响应体构造错误
    ///
    /// 依次识别 `{error:{...}}`、FastAPI 的 `{detail:{error:{...}}}` 与 `{detail:"..."}`，
    /// 都不匹配时使用 `Request failed with status code <status>`。
    pub fn from_response(status: u16, body: &Value) -> Self {
        let kind = if status == 401 {
            ErrorKind::Unauthorized
        } else {
            ErrorKind::Http { status }
        };

        let envelope = |v: &Value| serde_json::from_value::<ErrorResponse>(v.clone()).ok();
        let parsed = envelope(body).or_else(|| body.get("detail").and_then(envelope));

        if let Some(ErrorResponse { error }) = parsed {
            return Self {
                kind,
                message: error.message,
                code: error.code,
                details: error.details,
            };
        }

        if let Some(detail) = body.get("detail").and_then(Value::as_str) {
            return Self::new(kind, detail);
        }

        Self::new(kind, format!("Request failed with status code {}", status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_error_envelope() {
        let body = json!({ "error": { "message": "Project not found", "code": "NOT_FOUND" } });
        let err = ApiError::from_response(404, &body);
        assert_eq!(err.kind, ErrorKind::Http { status: 404 });
        assert_eq!(err.to_string(), "Project not found");
        assert_eq!(err.code.as_deref(), Some("NOT_FOUND"));
        assert!(err.details.is_none());
    }

    #[test]
    fn test_from_fastapi_detail_wrapper() {
        let body = json!({
            "detail": { "error": { "message": "Invalid email or password", "code": "INVALID_CREDENTIALS" } }
        });
        let err = ApiError::from_response(401, &body);
        assert!(err.is_unauthorized());
        assert_eq!(err.message, "Invalid email or password");
    }

    #[test]
    fn test_from_plain_detail_and_fallback() {
        let err = ApiError::from_response(422, &json!({ "detail": "Unprocessable" }));
        assert_eq!(err.message, "Unprocessable");

        let err = ApiError::from_response(500, &Value::Null);
        assert_eq!(err.message, "Request failed with status code 500");
    }

    #[test]
    fn test_incomplete_envelope_falls_back_to_status() {
        let body = json!({ "error": { "code": "CONFLICT", "details": { "field": "name" } } });
        let err = ApiError::from_response(409, &body);
        assert_eq!(err.message, "Request failed with status code 409");
        assert!(err.code.is_none());

        let body = json!({ "detail": { "error": { "message": "Name taken", "details": { "field": "name" } } } });
        let err = ApiError::from_response(409, &body);
        assert_eq!(err.message, "Name taken");
        assert_eq!(err.details, Some(json!({ "field": "name" })));
    }

    #[test]
    fn test_network_error_message() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.to_string(), NETWORK_ERROR);
        assert_eq!(err.details, Some(json!({ "cause": "connection refused" })));
    }
}
