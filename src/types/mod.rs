//! 领域类型与线上包结构
//!
//! 字段名与服务端 JSON 逐字一致；时间戳保留服务端 ISO-8601 字符串，不做解析。

pub mod activity;
pub mod agent;
pub mod analytics;
pub mod pipeline;
pub mod project;
pub mod user;

use serde::{Deserialize, Serialize};

pub use activity::{ActivityCategory, AiActivity, AiTool};
pub use agent::{AgentExecution, AgentStatus, AgentType};
pub use analytics::{
    ActivityTimeline, ProductivityMetrics, TimelineEntry, ToolComparison, UsageAnalytics,
};
pub use pipeline::{PipelineExecution, PipelineStatus};
pub use project::{Project, ProjectStatus};
pub use user::User;

/// 分页元数据 `meta`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            total: 0,
            total_pages: 0,
        }
    }
}

/// 列表响应 `{ data: [...], meta: {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// 单实体响应 `{ data: {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// 登录 / 注册返回的令牌对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// 认证响应 `{ data: User, tokens: {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub data: User,
    pub tokens: TokenPair,
}

/// 刷新响应 `{ access_token }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paginated_wire_shape() {
        let raw = json!({
            "data": [{
                "id": "p1",
                "name": "Forge",
                "repository_url": "https://github.com/acme/forge",
                "tech_stack": ["rust"],
                "status": "active",
                "created_by": "u1",
                "created_at": "2024-05-01T10:00:00"
            }],
            "meta": { "page": 1, "per_page": 20, "total": 45, "total_pages": 3 }
        });
        let page: Paginated<Project> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(page.data[0].status, ProjectStatus::Active);
        assert_eq!(page.meta.total, 45);
        assert_eq!(serde_json::to_value(&page).unwrap(), raw);
    }

    #[test]
    fn test_auth_response_shape() {
        let raw = json!({
            "data": {
                "id": "u1",
                "email": "dev@example.com",
                "username": "dev",
                "created_at": "2024-05-01T10:00:00"
            },
            "tokens": { "access_token": "a", "refresh_token": "r" }
        });
        let resp: AuthResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.data.username, "dev");
        assert!(resp.data.full_name.is_none());
        assert_eq!(resp.tokens.refresh_token, "r");
    }
}
