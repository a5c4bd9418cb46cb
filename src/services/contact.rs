//! Contact-form inbox: status, spam, reply and assignment.

use serde_json::json;
use validator::Validate;

use crate::errors::FetchError;
use crate::models::contact::{Contact, ContactPriority, ContactReply, ContactStats, ContactStatus, ReplyReceipt};
use crate::models::query::FilterQuery;
use crate::services::client::ApiClient;
use crate::services::resource::{ListParams, Resource};

pub const PATH: &str = "contacts";
pub const ITEMS_KEY: &str = "contacts";

#[derive(Debug, Clone, Default)]
pub struct ContactFilters {
    pub params: ListParams,
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
}

impl ContactFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt("status", self.status.map(|s| s.as_str()))
            .with_opt("priority", self.priority.map(|p| p.as_str()))
    }
}

pub fn resource(client: &ApiClient) -> Resource<Contact> {
    Resource::nested(client, PATH, ITEMS_KEY)
}

pub async fn stats(client: &ApiClient) -> Result<ContactStats, FetchError> {
    resource(client).stats().await
}

/// Send a reply email for a contact. Validated before any request is made.
pub async fn reply(
    client: &ApiClient,
    id: &str,
    reply: &ContactReply,
) -> Result<ReplyReceipt, FetchError> {
    reply.validate()?;
    let receipt: ReplyReceipt = client.post(&format!("{PATH}/{id}/reply"), reply).await?;
    if !receipt.email_sent {
        tracing::warn!(contact_id = %receipt.contact_id, "Reply stored but email not sent");
    }
    Ok(receipt)
}

pub async fn assign(client: &ApiClient, id: &str, assigned_to: &str) -> Result<Contact, FetchError> {
    client
        .patch(&format!("{PATH}/{id}/assign"), &json!({ "assignedTo": assigned_to }))
        .await
}
