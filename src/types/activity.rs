//! AI 工具使用记录

use serde::{Deserialize, Serialize};

/// 使用的 AI 工具
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiTool {
    Chatgpt,
    Claude,
    Copilot,
    Cursor,
}

/// 活动分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Feature,
    Bugfix,
    Refactor,
    Docs,
    Test,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiActivity {
    pub id: String,
    pub project_id: String,
    pub tool_used: AiTool,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default)]
    pub code_changes: Vec<String>,
    pub timestamp: String,
    pub user_id: String,
    pub category: ActivityCategory,
}
