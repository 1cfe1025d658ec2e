//! 分析类只读数据（图表用）

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageAnalytics {
    pub total_prompts: u64,
    pub prompts_by_tool: BTreeMap<String, u64>,
    pub prompts_by_category: BTreeMap<String, u64>,
    pub total_cost_estimate: f64,
    pub avg_tokens_per_prompt: f64,
    pub time_saved_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityMetrics {
    pub total_commits: u64,
    pub lines_of_code_changed: u64,
    pub ai_assisted_commits: u64,
    pub ai_contribution_percentage: f64,
    pub test_coverage: f64,
    pub avg_build_time_minutes: f64,
}

/// 时间线中的单条活动
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: String,
    pub tool: String,
    pub category: String,
    pub timestamp: String,
}

/// 按日期（YYYY-MM-DD）分组的活动时间线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTimeline {
    pub timeline: BTreeMap<String, Vec<TimelineEntry>>,
    pub total_days: u64,
    pub total_activities: u64,
}

/// 各工具使用量对比（服务端按 total_usage 降序）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolComparison {
    pub tool: String,
    pub total_usage: u64,
    pub categories: BTreeMap<String, u64>,
    pub percentage: f64,
}
