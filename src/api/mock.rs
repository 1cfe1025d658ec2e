//! Mock 传输（用于测试与离线演示，无需后端）
//!
//! 路由按 method + path（+ 可选查询对子集）匹配，先进先出消费；
//! 可设置闸门，由调用方决定响应何时返回，用于复现并发请求的完成顺序。

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{oneshot, Mutex};

use super::{ApiError, ApiRequest, ApiResponse, ErrorKind, Method, Transport};

/// 闸门：release 之前对应路由的响应一直挂起
pub struct MockGate(oneshot::Sender<()>);

impl MockGate {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

/// 一条预设响应
pub struct MockRoute {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    outcome: Result<ApiResponse, ApiError>,
    gate: Option<oneshot::Receiver<()>>,
}

impl MockRoute {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            outcome: Ok(ApiResponse::new(200, Value::Null)),
            gate: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// 仅当请求的查询参数包含该对时匹配
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn reply(self, status: u16, body: Value) -> Self {
        self.respond(ApiResponse::new(status, body))
    }

    pub fn respond(mut self, response: ApiResponse) -> Self {
        self.outcome = Ok(response);
        self
    }

    /// 传输层失败（如断网）
    pub fn fail(mut self, error: ApiError) -> Self {
        self.outcome = Err(error);
        self
    }

    /// 加闸门，返回控制端
    pub fn gated(mut self) -> (Self, MockGate) {
        let (tx, rx) = oneshot::channel();
        self.gate = Some(rx);
        (self, MockGate(tx))
    }

    fn matches(&self, request: &ApiRequest) -> bool {
        self.method == request.method
            && self.path == request.path
            && self
                .query
                .iter()
                .all(|(k, v)| request.query_value(k) == Some(v.as_str()))
    }
}

/// Mock 传输：记录所有请求，按预设路由应答；无匹配路由时返回 404
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<MockRoute>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, route: MockRoute) {
        self.routes.lock().await.push(route);
    }

    /// 已收到的请求（按到达顺序）
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    /// 尚未消费的路由数
    pub async fn pending_routes(&self) -> usize {
        self.routes.lock().await.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().await.push(request.clone());

        let route = {
            let mut routes = self.routes.lock().await;
            routes
                .iter()
                .position(|r| r.matches(&request))
                .map(|idx| routes.remove(idx))
        };

        let Some(route) = route else {
            tracing::debug!(method = %request.method, path = %request.path, "no mock route");
            return Err(ApiError::new(
                ErrorKind::Http { status: 404 },
                format!("No mock route for {} {}", request.method, request.path),
            ));
        };

        if let Some(gate) = route.gate {
            // 控制端被丢弃时视同放行
            let _ = gate.await;
        }
        route.outcome
    }
}
