use serde::Serialize;
use serde_json::{Map, Value};

use super::resource_path;
use crate::api::{ApiClient, ApiError};
use crate::types::{AgentExecution, AgentType, DataEnvelope};

const BASE: &str = "/agents";

/// 提交一次 Agent 执行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentExecutionCreate {
    pub project_id: String,
    pub agent_type: String,
    pub task_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data: Option<Map<String, Value>>,
}

#[derive(Clone)]
pub struct AgentService {
    client: ApiClient,
}

impl AgentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn execute(&self, data: &AgentExecutionCreate) -> Result<DataEnvelope<AgentExecution>, ApiError> {
        self.client.post(BASE, data).await
    }

    pub async fn get(&self, id: &str) -> Result<DataEnvelope<AgentExecution>, ApiError> {
        self.client.get(&resource_path(BASE, id)?, Vec::new()).await
    }

    pub async fn list_types(&self) -> Result<DataEnvelope<Vec<AgentType>>, ApiError> {
        self.client.get("/agents/types", Vec::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, MockRoute, MockTransport};
    use crate::types::AgentStatus;
    use serde_json::json;
    use std::sync::Arc;

    fn execution(status: &str) -> Value {
        json!({
            "id": "ex-1",
            "project_id": "p1",
            "agent_type": "code_review",
            "task_description": "Review the parser",
            "status": status,
            "started_at": "2024-05-01T10:00:00"
        })
    }

    fn service() -> (AgentService, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        (AgentService::new(ApiClient::new(mock.clone())), mock)
    }

    #[tokio::test]
    async fn test_execute_posts_task() {
        let (service, mock) = service();
        mock.push(MockRoute::post("/agents").reply(201, json!({ "data": execution("pending") })))
            .await;

        let created = service
            .execute(&AgentExecutionCreate {
                project_id: "p1".into(),
                agent_type: "code_review".into(),
                task_description: "Review the parser".into(),
                input_data: None,
            })
            .await
            .unwrap()
            .data;
        assert_eq!(created.status, AgentStatus::Pending);
        assert!(created.output_data.is_none());

        let sent = &mock.requests().await[0];
        assert_eq!(sent.method, Method::Post);
        assert_eq!(
            sent.body,
            Some(json!({
                "project_id": "p1",
                "agent_type": "code_review",
                "task_description": "Review the parser"
            }))
        );
    }

    #[tokio::test]
    async fn test_get_and_list_types() {
        let (service, mock) = service();
        mock.push(MockRoute::get("/agents/ex-1").reply(200, json!({ "data": execution("completed") })))
            .await;
        mock.push(MockRoute::get("/agents/types").reply(
            200,
            json!({ "data": [{
                "id": "code_review",
                "name": "Code Review",
                "description": "Reviews pull requests",
                "requires_mcp_server": false
            }] }),
        ))
        .await;

        let fetched = service.get("ex-1").await.unwrap().data;
        assert_eq!(fetched.status, AgentStatus::Completed);

        let types = service.list_types().await.unwrap().data;
        assert_eq!(types.len(), 1);
        assert!(types[0].capabilities.is_empty());

        let paths: Vec<String> = mock.requests().await.into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/agents/ex-1", "/agents/types"]);
        assert_eq!(mock.pending_routes().await, 0);
    }

    #[tokio::test]
    async fn test_get_rejects_unsafe_id() {
        let (service, mock) = service();
        assert!(service.get("../types").await.is_err());
        assert!(mock.requests().await.is_empty());
    }
}
