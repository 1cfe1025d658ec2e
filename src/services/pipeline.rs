use serde::Serialize;

use super::{resource_path, validate_paging};
use crate::api::{to_query, ApiClient, ApiError};
use crate::types::{DataEnvelope, Paginated, PipelineExecution, PipelineStatus};

const BASE: &str = "/pipelines";

/// 流水线列表参数（服务端状态过滤字段名为 status_filter）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<PipelineStatus>,
}

/// 触发一次构建
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineTrigger {
    pub project_id: String,
    pub branch: String,
    pub commit_sha: String,
}

#[derive(Clone)]
pub struct PipelineService {
    client: ApiClient,
}

impl PipelineService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &PipelineListParams) -> Result<Paginated<PipelineExecution>, ApiError> {
        validate_paging(params.page, params.per_page)?;
        self.client.get(BASE, to_query(params)?).await
    }

    pub async fn get(&self, id: &str) -> Result<DataEnvelope<PipelineExecution>, ApiError> {
        self.client.get(&resource_path(BASE, id)?, Vec::new()).await
    }

    pub async fn trigger(&self, data: &PipelineTrigger) -> Result<DataEnvelope<PipelineExecution>, ApiError> {
        self.client.post(BASE, data).await
    }
}
