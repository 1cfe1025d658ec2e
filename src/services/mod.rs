//! 资源服务：把领域操作翻译为 ApiClient 调用
//!
//! 纯翻译层，无状态、不捕获错误：参数序列化为查询串或请求体，响应包原样返回。
//! 参数结构在发送前按服务端约束做本地校验（page >= 1，1 <= per_page <= 100）。

pub mod agent;
pub mod ai_activity;
pub mod analytics;
pub mod auth;
pub mod pipeline;
pub mod project;

pub use agent::{AgentExecutionCreate, AgentService};
pub use ai_activity::{AiActivityCreate, AiActivityListParams, AiActivityService};
pub use analytics::{AnalyticsService, ProductivityParams, TimelineParams, UsageParams};
pub use auth::{AuthService, LoginRequest, RegisterRequest};
pub use pipeline::{PipelineListParams, PipelineService, PipelineTrigger};
pub use project::{ProjectCreate, ProjectListParams, ProjectService, ProjectUpdate};

use crate::api::{ApiClient, ApiError};

/// 每页条数上限（与服务端一致）
pub const MAX_PER_PAGE: u32 = 100;

/// 全部资源服务的集合，共享同一个 ApiClient
#[derive(Clone)]
pub struct Services {
    pub projects: ProjectService,
    pub ai_activities: AiActivityService,
    pub agents: AgentService,
    pub analytics: AnalyticsService,
    pub pipelines: PipelineService,
    pub auth: AuthService,
}

impl Services {
    pub fn new(client: ApiClient) -> Self {
        Self {
            projects: ProjectService::new(client.clone()),
            ai_activities: AiActivityService::new(client.clone()),
            agents: AgentService::new(client.clone()),
            analytics: AnalyticsService::new(client.clone()),
            pipelines: PipelineService::new(client.clone()),
            auth: AuthService::new(client),
        }
    }
}

/// 校验分页参数
pub(crate) fn validate_paging(page: Option<u32>, per_page: Option<u32>) -> Result<(), ApiError> {
    if page == Some(0) {
        return Err(ApiError::invalid_params("page must be >= 1"));
    }
    if let Some(n) = per_page {
        if n == 0 || n > MAX_PER_PAGE {
            return Err(ApiError::invalid_params(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
    }
    Ok(())
}

/// 拒绝空 ID，避免拼出 `/projects/` 这类集合路径
pub(crate) fn resource_path(base: &str, id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(ApiError::invalid_params(format!("Invalid resource id: '{}'", id)));
    }
    Ok(format!("{}/{}", base, id))
}
