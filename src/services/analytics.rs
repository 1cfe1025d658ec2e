//! 分析服务：使用量、生产力、时间线、工具对比（只读）

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::{to_query, ApiClient, ApiError};
use crate::types::{ActivityTimeline, DataEnvelope, ProductivityMetrics, ToolComparison, UsageAnalytics};

/// 使用量统计参数；日期按 YYYY-MM-DD 发送
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl UsageParams {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ApiError::invalid_params("start_date must not be after end_date"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductivityParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// 时间线参数：最近 days 天（服务端默认 30，范围 1..=365）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimelineParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

impl TimelineParams {
    pub fn validate(&self) -> Result<(), ApiError> {
        match self.days {
            Some(d) if d == 0 || d > 365 => {
                Err(ApiError::invalid_params("days must be between 1 and 365"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct AnalyticsService {
    client: ApiClient,
}

impl AnalyticsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn usage(&self, params: &UsageParams) -> Result<DataEnvelope<UsageAnalytics>, ApiError> {
        params.validate()?;
        self.client.get("/analytics/usage", to_query(params)?).await
    }

    pub async fn productivity(
        &self,
        params: &ProductivityParams,
    ) -> Result<DataEnvelope<ProductivityMetrics>, ApiError> {
        self.client.get("/analytics/productivity", to_query(params)?).await
    }

    pub async fn timeline(&self, params: &TimelineParams) -> Result<DataEnvelope<ActivityTimeline>, ApiError> {
        params.validate()?;
        self.client.get("/analytics/timeline", to_query(params)?).await
    }

    pub async fn tools_comparison(
        &self,
        params: &ProductivityParams,
    ) -> Result<DataEnvelope<Vec<ToolComparison>>, ApiError> {
        self.client.get("/analytics/tools-comparison", to_query(params)?).await
    }
}
