//! Dashboard overview, analytics, visitors and system logs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    #[serde(default)]
    pub total_contacts: u64,
    #[serde(default)]
    pub total_projects: u64,
    #[serde(default)]
    pub total_blogs: u64,
    #[serde(default)]
    pub total_visitors: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub total_newsletter_subscribers: u64,
    #[serde(default)]
    pub total_newsletter_campaigns: u64,
}

/// `data` of `GET dashboard`. Sections other than the overview are kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub overview: DashboardOverview,
    #[serde(default)]
    pub growth: Value,
    #[serde(default)]
    pub analytics: Value,
    #[serde(default)]
    pub top_content: Value,
    #[serde(default)]
    pub demographics: Value,
    #[serde(default)]
    pub recent: Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    Day,
    Week,
    Month,
    Year,
}

impl AnalyticsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDay {
    pub date: String,
    #[serde(default)]
    pub page_views: u64,
    #[serde(default)]
    pub unique_visitors: u64,
    #[serde(default)]
    pub bounce_rate: f64,
    #[serde(default)]
    pub session_duration: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsMetrics {
    pub avg_page_views: f64,
    pub avg_unique_visitors: f64,
    pub avg_bounce_rate: f64,
    pub avg_session_duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    #[serde(default)]
    pub analytics: Vec<AnalyticsDay>,
    #[serde(default)]
    pub metrics: AnalyticsMetrics,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub total_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub location: Value,
    #[serde(default)]
    pub device: Value,
    #[serde(default)]
    pub visit_count: u64,
    #[serde(default)]
    pub last_visit: String,
}

impl Entity for Visitor {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// Server log line. Logs carry no `_id`; the timestamp identifies them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemLog {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Entity for SystemLog {
    fn id(&self) -> &str {
        &self.timestamp
    }
}
