//! 项目服务：`/projects` CRUD

use serde::Serialize;

use super::{resource_path, validate_paging};
use crate::api::{to_query, ApiClient, ApiError};
use crate::types::{DataEnvelope, Paginated, Project, ProjectStatus};

const BASE: &str = "/projects";

/// 列表查询参数；缺省字段不发送
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// 名称模糊匹配
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl ProjectListParams {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        validate_paging(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub repository_url: String,
    pub tech_stack: Vec<String>,
}

/// 局部更新：只发送给出的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

#[derive(Clone)]
pub struct ProjectService {
    client: ApiClient,
}

impl ProjectService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &ProjectListParams) -> Result<Paginated<Project>, ApiError> {
        params.validate()?;
        self.client.get(BASE, to_query(params)?).await
    }

    pub async fn get(&self, id: &str) -> Result<DataEnvelope<Project>, ApiError> {
        self.client.get(&resource_path(BASE, id)?, Vec::new()).await
    }

    pub async fn create(&self, data: &ProjectCreate) -> Result<DataEnvelope<Project>, ApiError> {
        self.client.post(BASE, data).await
    }

    pub async fn update(&self, id: &str, data: &ProjectUpdate) -> Result<DataEnvelope<Project>, ApiError> {
        self.client.put(&resource_path(BASE, id)?, data).await
    }

    /// 服务端返回 204，无响应体
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&resource_path(BASE, id)?).await
    }
}
