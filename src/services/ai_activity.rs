//! AI 活动服务：`/ai-activities`

use serde::Serialize;

use super::{resource_path, validate_paging};
use crate::api::{to_query, ApiClient, ApiError};
use crate::types::{ActivityCategory, AiActivity, AiTool, DataEnvelope, Paginated};

const BASE: &str = "/ai-activities";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AiActivityListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_used: Option<AiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ActivityCategory>,
}

impl AiActivityListParams {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// 某个项目下的活动
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        validate_paging(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiActivityCreate {
    pub project_id: String,
    pub tool_used: AiTool,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_changes: Option<Vec<String>>,
    pub category: ActivityCategory,
}

#[derive(Clone)]
pub struct AiActivityService {
    client: ApiClient,
}

impl AiActivityService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &AiActivityListParams) -> Result<Paginated<AiActivity>, ApiError> {
        params.validate()?;
        self.client.get(BASE, to_query(params)?).await
    }

    pub async fn get(&self, id: &str) -> Result<DataEnvelope<AiActivity>, ApiError> {
        self.client.get(&resource_path(BASE, id)?, Vec::new()).await
    }

    pub async fn create(&self, data: &AiActivityCreate) -> Result<DataEnvelope<AiActivity>, ApiError> {
        self.client.post(BASE, data).await
    }
}
