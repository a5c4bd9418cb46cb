//! Newsletter subscribers and campaigns.

use serde_json::{json, Value};
use validator::Validate;

use crate::errors::FetchError;
use crate::models::newsletter::{Campaign, CampaignStatus, SubscribeRequest, Subscriber, SubscriberStatus};
use crate::models::query::FilterQuery;
use crate::models::Record;
use crate::services::client::ApiClient;
use crate::services::resource::{ListParams, Resource};

pub const SUBSCRIBERS_PATH: &str = "newsletter/subscribers";
pub const CAMPAIGNS_PATH: &str = "newsletter/campaigns";

#[derive(Debug, Clone, Default)]
pub struct SubscriberFilters {
    pub params: ListParams,
    pub status: Option<SubscriberStatus>,
}

impl SubscriberFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt("status", self.status.map(|s| s.as_str()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CampaignFilters {
    pub params: ListParams,
    pub status: Option<CampaignStatus>,
}

impl CampaignFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt("status", self.status.map(|s| s.as_str()))
    }
}

pub fn subscribers(client: &ApiClient) -> Resource<Subscriber> {
    Resource::nested(client, SUBSCRIBERS_PATH, "subscribers")
}

pub fn campaigns(client: &ApiClient) -> Resource<Campaign> {
    Resource::nested(client, CAMPAIGNS_PATH, "campaigns")
}

/// Add a subscriber by hand.
pub async fn subscribe(client: &ApiClient, request: &SubscribeRequest) -> Result<Value, FetchError> {
    request.validate()?;
    client.post("newsletter/subscribe", request).await
}

/// Flip the subscription state of whoever owns `email`.
pub async fn toggle_status(client: &ApiClient, email: &str) -> Result<Value, FetchError> {
    client
        .post("newsletter/toggle-status", &json!({ "email": email }))
        .await
}

pub async fn export_subscribers(client: &ApiClient) -> Result<Vec<Record>, FetchError> {
    client.get(&format!("{SUBSCRIBERS_PATH}/export")).await
}
