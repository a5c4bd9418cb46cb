//! Dashboard overview, analytics, visitors and system logs.

use chrono::NaiveDate;

use crate::errors::FetchError;
use crate::models::dashboard::{AnalyticsData, AnalyticsPeriod, DashboardData, LogLevel, SystemLog, Visitor};
use crate::models::query::FilterQuery;
use crate::services::client::ApiClient;
use crate::services::resource::{ListParams, Resource};

pub async fn overview(client: &ApiClient) -> Result<DashboardData, FetchError> {
    client.get("dashboard").await
}

/// Analytics between two dates, bucketed by `period`.
pub async fn analytics(
    client: &ApiClient,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    period: Option<AnalyticsPeriod>,
) -> Result<AnalyticsData, FetchError> {
    let query = FilterQuery::new()
        .with_opt("startDate", start.map(|d| d.format("%Y-%m-%d").to_string()))
        .with_opt("endDate", end.map(|d| d.format("%Y-%m-%d").to_string()))
        .with_opt("period", period.map(|p| p.as_str()))
        .build();
    client.get_with("analytics", &query).await
}

pub fn visitors(client: &ApiClient) -> Resource<Visitor> {
    Resource::nested(client, "visitors", "visitors")
}

#[derive(Debug, Clone, Default)]
pub struct LogFilters {
    pub params: ListParams,
    pub level: Option<LogLevel>,
}

impl LogFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt("level", self.level.map(|l| l.as_str()))
    }
}

pub fn logs(client: &ApiClient) -> Resource<SystemLog> {
    Resource::nested(client, "logs", "logs")
}
