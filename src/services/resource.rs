//! Generic CRUD service shared by every admin collection.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::errors::FetchError;
use crate::models::pagination::Page;
use crate::models::query::{self, FilterQuery, SortOrder};
use crate::models::Entity;
use crate::services::client::ApiClient;

/// Paging, search and sort fields every list endpoint accepts.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
}

impl ListParams {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> FilterQuery {
        FilterQuery::new()
            .with_opt(query::PAGE, self.page)
            .with_opt(query::LIMIT, self.limit)
            .with_opt(query::SEARCH, self.search.clone())
            .with_opt(query::SORT_BY, self.sort_by.clone())
            .with_opt(query::ORDER, self.order)
    }
}

/// Flag and status mutations exposed as `PATCH {path}/{id}/<action>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldToggle {
    /// `isActive`, via `/toggle`.
    Active,
    /// `featured`, via `/feature`.
    Featured,
    /// `verified`, via `/verify`.
    Verified,
    /// `published`, via `/publish`.
    Published,
    /// Contact spam flag, via `/spam`.
    Spam,
    /// Explicit status, via `/status` with `{ "status": .. }`.
    Status(String),
}

impl FieldToggle {
    /// Path segment appended after the item id.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Active => "toggle",
            Self::Featured => "feature",
            Self::Verified => "verify",
            Self::Published => "publish",
            Self::Spam => "spam",
            Self::Status(_) => "status",
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::Status(status) => json!({ "status": status }),
            _ => json!({}),
        }
    }

    /// Parse a CLI-style action name; `status=<value>` selects [`FieldToggle::Status`].
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(status) = raw.strip_prefix("status=") {
            return (!status.is_empty()).then(|| Self::Status(status.to_string()));
        }
        match raw {
            "toggle" | "active" => Some(Self::Active),
            "feature" | "featured" => Some(Self::Featured),
            "verify" | "verified" => Some(Self::Verified),
            "publish" | "published" => Some(Self::Published),
            "spam" => Some(Self::Spam),
            _ => None,
        }
    }
}

/// The operations a list screen needs from a domain service.
#[async_trait]
pub trait CollectionService: Send + Sync {
    type Item: Entity;

    async fn list(&self, query: &FilterQuery) -> Result<Page<Self::Item>, FetchError>;

    async fn delete(&self, id: &str) -> Result<(), FetchError>;

    /// Apply a toggle and return the fields the server reports for the item afterwards.
    async fn toggle(&self, id: &str, field: &FieldToggle) -> Result<Map<String, Value>, FetchError>;
}

/// REST collection rooted at `path`.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    client: ApiClient,
    path: String,
    items_key: Option<String>,
    _item: PhantomData<fn() -> T>,
}

impl<T: Entity> Resource<T> {
    /// Collection whose list payload is the bare items array.
    pub fn flat(client: &ApiClient, path: &str) -> Self {
        Self {
            client: client.clone(),
            path: path.trim_matches('/').to_string(),
            items_key: None,
            _item: PhantomData,
        }
    }

    /// Collection whose list payload nests the items under `items_key`.
    pub fn nested(client: &ApiClient, path: &str, items_key: &str) -> Self {
        Self {
            items_key: Some(items_key.to_string()),
            ..Self::flat(client, path)
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `{path}/{suffix}`
    pub fn sub_path(&self, suffix: &str) -> String {
        format!("{}/{}", self.path, suffix.trim_start_matches('/'))
    }

    pub async fn list(&self, query: &FilterQuery) -> Result<Page<T>, FetchError> {
        self.client
            .fetch_page(&self.path, self.items_key.as_deref(), query)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<T, FetchError> {
        self.client.get(&self.sub_path(id)).await
    }

    /// Validate `input` and create a new item.
    pub async fn create<I: Serialize + Validate + Sync>(&self, input: &I) -> Result<T, FetchError> {
        input.validate()?;
        self.client.post(&self.path, input).await
    }

    /// Validate `input` and replace the item.
    pub async fn update<I: Serialize + Validate + Sync>(
        &self,
        id: &str,
        input: &I,
    ) -> Result<T, FetchError> {
        input.validate()?;
        self.client.put(&self.sub_path(id), input).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), FetchError> {
        self.client.delete(&self.sub_path(id)).await?;
        tracing::info!(collection = %self.path, id, "Deleted item");
        Ok(())
    }

    pub async fn toggle(&self, id: &str, field: &FieldToggle) -> Result<Map<String, Value>, FetchError> {
        let path = self.sub_path(&format!("{id}/{}", field.action()));
        let value: Value = self.client.patch(&path, &field.body()).await?;
        match value {
            Value::Object(fields) => Ok(fields),
            other => Err(FetchError::Decode(format!(
                "`{path}` returned {other} instead of the updated item"
            ))),
        }
    }

    /// `GET {path}/stats`
    pub async fn stats<S: DeserializeOwned>(&self) -> Result<S, FetchError> {
        self.client.get(&self.sub_path("stats")).await
    }
}

#[async_trait]
impl<T: Entity> CollectionService for Resource<T> {
    type Item = T;

    async fn list(&self, query: &FilterQuery) -> Result<Page<T>, FetchError> {
        Resource::list(self, query).await
    }

    async fn delete(&self, id: &str) -> Result<(), FetchError> {
        Resource::delete(self, id).await
    }

    async fn toggle(&self, id: &str, field: &FieldToggle) -> Result<Map<String, Value>, FetchError> {
        Resource::toggle(self, id, field).await
    }
}
