//! HTTP transport for the portfolio API.
//!
//! Every call is a single attempt: no retries, no cancellation. The response envelope
//! is unwrapped here so callers only ever see typed data or a [`FetchError`].

use std::sync::Arc;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::errors::{ApiResponse, FetchError};
use crate::middleware::auth::{self as auth_middleware, Access};
use crate::models::pagination::{CollectionPayload, Page};
use crate::models::query::{FilterQuery, SerializedQuery};
use crate::session::SessionContext;

/// Body variants a request can carry.
enum Body {
    Empty,
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// Shared, cheaply cloneable API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionContext>,
    default_limit: u32,
}

impl ApiClient {
    /// Build a client for `config.api_url` using the given session for credentials.
    pub fn new(config: &ClientConfig, session: Arc<SessionContext>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| FetchError::Transport {
            status: None,
            message: format!("Failed to build HTTP client: {e}"),
        })?;
        Self::with_client(http, config, session)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        config: &ClientConfig,
        session: Arc<SessionContext>,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            base_url: parse_base(&config.api_url)?,
            session,
            default_limit: config.default_page_limit.max(1),
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Resolve a collection path (`content/blogs`, `contacts/42/status`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::Transport {
                status: None,
                message: format!("Invalid endpoint `{path}`: {e}"),
            })
    }

    /// Resolve `path`, then append `key` as one encoded segment followed by `suffix`.
    ///
    /// Storage keys contain `/`; this keeps them from splitting into several segments.
    pub fn keyed_endpoint(&self, path: &str, key: &str, suffix: Option<&str>) -> Result<Url, FetchError> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|()| FetchError::Transport {
                status: None,
                message: format!("API URL cannot carry path `{path}`"),
            })?
            .pop_if_empty()
            .push(key)
            .extend(suffix);
        Ok(url)
    }

    /// Fetch one page of a collection.
    ///
    /// * `items_key` - name of the items array when the endpoint nests it inside `data`.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        items_key: Option<&str>,
        query: &FilterQuery,
    ) -> Result<Page<T>, FetchError> {
        let envelope = self
            .execute(
                Method::GET,
                self.endpoint(path)?,
                &query.build(),
                Body::Empty,
                Access::Authenticated,
            )
            .await?;

        let data = envelope
            .data
            .ok_or_else(|| FetchError::Decode(format!("`{path}` returned no data")))?;
        let payload: CollectionPayload = serde_json::from_value(data)?;
        let fallback_limit = query.limit().unwrap_or(self.default_limit);

        let page = payload.into_page(items_key, envelope.pagination, fallback_limit)?;
        tracing::debug!(
            endpoint = path,
            items = page.items.len(),
            current = page.meta.current,
            pages = page.meta.pages,
            "Fetched page"
        );
        Ok(page)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.get_with(path, &SerializedQuery::default()).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &SerializedQuery,
    ) -> Result<T, FetchError> {
        self.get_url(self.endpoint(path)?, query).await
    }

    /// GET an already resolved URL, such as one from [`Self::keyed_endpoint`].
    pub async fn get_url<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &SerializedQuery,
    ) -> Result<T, FetchError> {
        let envelope = self
            .execute(Method::GET, url, query, Body::Empty, Access::Authenticated)
            .await?;
        into_data(envelope)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        self.send_json(Method::POST, path, body, Access::Authenticated)
            .await
    }

    /// POST without credentials (sign-in).
    pub async fn post_anonymous<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        self.send_json(Method::POST, path, body, Access::Anonymous)
            .await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        self.send_json(Method::PUT, path, body, Access::Authenticated)
            .await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        self.send_json(Method::PATCH, path, body, Access::Authenticated)
            .await
    }

    /// DELETE, discarding whatever `data` comes back.
    pub async fn delete(&self, path: &str) -> Result<(), FetchError> {
        self.delete_url(self.endpoint(path)?).await
    }

    pub async fn delete_url(&self, url: Url) -> Result<(), FetchError> {
        self.execute(
            Method::DELETE,
            url,
            &SerializedQuery::default(),
            Body::Empty,
            Access::Authenticated,
        )
        .await?;
        Ok(())
    }

    /// POST a multipart form (media uploads).
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, FetchError> {
        let envelope = self
            .execute(
                Method::POST,
                self.endpoint(path)?,
                &SerializedQuery::default(),
                Body::Multipart(form),
                Access::Authenticated,
            )
            .await?;
        into_data(envelope)
    }

    // ---- private helpers ----

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        access: Access,
    ) -> Result<T, FetchError> {
        let body = serde_json::to_value(body)?;
        let envelope = self
            .execute(
                method,
                self.endpoint(path)?,
                &SerializedQuery::default(),
                Body::Json(body),
                access,
            )
            .await?;
        into_data(envelope)
    }

    /// Issue one request and unwrap the envelope.
    async fn execute(
        &self,
        method: Method,
        mut url: Url,
        query: &SerializedQuery,
        body: Body,
        access: Access,
    ) -> Result<ApiResponse<Value>, FetchError> {
        query.append_to(&mut url);

        tracing::debug!(method = %method, endpoint = %url, "Sending request");

        let mut request = self.http.request(method.clone(), url.clone());
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(&value),
            Body::Multipart(form) => request.multipart(form),
        };
        request =
            auth_middleware::attach_credentials(request, &url, &self.base_url, access, &self.session);

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %method, endpoint = %url, error = %e, "Request failed");
            FetchError::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if let Some(err) = auth_middleware::check_unauthorized(status, access, &self.session) {
            return Err(err);
        }

        let text = response.text().await.map_err(|e| FetchError::Transport {
            status: Some(status.as_u16()),
            message: format!("Failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiResponse<Value>>(&text)
                .ok()
                .and_then(|env| env.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            tracing::warn!(
                method = %method,
                endpoint = %url,
                status = status.as_u16(),
                message = %message,
                "API returned error status"
            );
            return Err(FetchError::Transport {
                status: Some(status.as_u16()),
                message,
            });
        }

        let envelope: ApiResponse<Value> = if text.trim().is_empty() {
            ApiResponse {
                success: true,
                message: None,
                data: None,
                pagination: None,
                errors: Vec::new(),
            }
        } else {
            serde_json::from_str(&text)?
        };

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Request was rejected".to_string());
            tracing::warn!(endpoint = %url, message = %message, "API rejected request");
            return Err(FetchError::ApiRejected {
                message,
                errors: envelope.errors,
            });
        }

        Ok(envelope)
    }
}

fn parse_base(api_url: &str) -> Result<Url, FetchError> {
    // A trailing slash makes `join` append to the path instead of replacing its last segment.
    let normalized = if api_url.ends_with('/') {
        api_url.to_string()
    } else {
        format!("{api_url}/")
    };
    Url::parse(&normalized).map_err(|e| FetchError::Transport {
        status: None,
        message: format!("Invalid API URL `{api_url}`: {e}"),
    })
}

fn into_data<T: DeserializeOwned>(envelope: ApiResponse<Value>) -> Result<T, FetchError> {
    Ok(serde_json::from_value(envelope.data.unwrap_or(Value::Null))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> ApiClient {
        ApiClient::new(
            &ClientConfig::for_api(api_url),
            Arc::new(SessionContext::in_memory()),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let c = client("https://api.example.com/api/v1");
        assert_eq!(
            c.endpoint("content/blogs").unwrap().as_str(),
            "https://api.example.com/api/v1/content/blogs"
        );
        assert_eq!(
            c.endpoint("/contacts/abc/status").unwrap().as_str(),
            "https://api.example.com/api/v1/contacts/abc/status"
        );
    }

    #[test]
    fn storage_key_is_one_segment() {
        let c = client("https://api.example.com/api/v1");
        assert_eq!(
            c.keyed_endpoint("media/files", "uploads/2024/a b.png", Some("signed-url"))
                .unwrap()
                .as_str(),
            "https://api.example.com/api/v1/media/files/uploads%2F2024%2Fa%20b.png/signed-url"
        );
        assert_eq!(
            c.keyed_endpoint("media/files", "plain-key_1.webp", None)
                .unwrap()
                .as_str(),
            "https://api.example.com/api/v1/media/files/plain-key_1.webp"
        );
    }

    #[test]
    fn invalid_base_is_rejected() {
        let result = ApiClient::new(
            &ClientConfig::for_api("not a url"),
            Arc::new(SessionContext::in_memory()),
        );
        assert!(matches!(result, Err(FetchError::Transport { status: None, .. })));
    }

    #[test]
    fn into_data_accepts_missing_data_for_unit() {
        let env: ApiResponse<Value> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(into_data::<()>(env).is_ok());
    }
}
