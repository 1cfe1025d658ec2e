//! 异步操作协调：pending → fulfilled | rejected
//!
//! 每次派发的操作带唯一 RequestId，恰好运行一次：无重试、无取消、无超时。
//! 失败时只上报消息（为空则用操作自带的兜底文案），由各 Store 的 reducer 决定如何落状态。

use std::fmt;
use std::future::Future;

use uuid::Uuid;

use super::{Action, Store};
use crate::api::ApiError;

/// 一次派发的唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 生命周期阶段
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<P> {
    Pending,
    Fulfilled(P),
    Rejected { message: String },
}

/// 带 RequestId 的生命周期动作
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncAction<P> {
    pub request_id: RequestId,
    pub phase: Phase<P>,
}

impl<P> AsyncAction<P> {
    pub fn pending(request_id: RequestId) -> Self {
        Self {
            request_id,
            phase: Phase::Pending,
        }
    }

    pub fn fulfilled(request_id: RequestId, payload: P) -> Self {
        Self {
            request_id,
            phase: Phase::Fulfilled(payload),
        }
    }

    pub fn rejected(request_id: RequestId, message: impl Into<String>) -> Self {
        Self {
            request_id,
            phase: Phase::Rejected {
                message: message.into(),
            },
        }
    }
}

/// 异步操作描述：名称（日志用）、兜底错误文案、包装成根 Action 的方式
pub struct Operation<P> {
    pub name: &'static str,
    pub fallback: &'static str,
    pub wrap: fn(AsyncAction<P>) -> Action,
}

impl<P: Clone> Operation<P> {
    /// 派发 pending，等待 future，再派发 fulfilled / rejected；结果原样返回调用方
    pub async fn run<F>(&self, store: &Store, future: F) -> Result<P, ApiError>
    where
        F: Future<Output = Result<P, ApiError>>,
    {
        let request_id = RequestId::new();
        tracing::debug!(op = self.name, request_id = %request_id, "pending");
        store.dispatch((self.wrap)(AsyncAction::pending(request_id)));

        match future.await {
            Ok(payload) => {
                tracing::debug!(op = self.name, request_id = %request_id, "fulfilled");
                store.dispatch((self.wrap)(AsyncAction::fulfilled(request_id, payload.clone())));
                Ok(payload)
            }
            Err(err) => {
                let message = rejection_message(&err, self.fallback);
                tracing::warn!(op = self.name, request_id = %request_id, "rejected: {}", message);
                store.dispatch((self.wrap)(AsyncAction::rejected(request_id, message)));
                Err(err)
            }
        }
    }
}

/// 错误消息为空时回退到兜底文案
pub fn rejection_message(err: &ApiError, fallback: &str) -> String {
    if err.message.trim().is_empty() {
        fallback.to_string()
    } else {
        err.message.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;

    #[test]
    fn test_rejection_message_fallback() {
        let err = ApiError::new(ErrorKind::Http { status: 500 }, "");
        assert_eq!(rejection_message(&err, "Failed to fetch projects"), "Failed to fetch projects");

        let err = ApiError::network("refused");
        assert_eq!(rejection_message(&err, "Failed to fetch projects"), "Network Error");
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }
}
