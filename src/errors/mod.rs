//! Response envelope and client error taxonomy.

use serde::{Deserialize, Serialize};

use crate::models::pagination::RawPagination;

/// Field-level error detail carried by a rejected envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiFieldError {
    pub field: String,
    pub message: String,
}

/// Consistent JSON envelope returned by every API endpoint.
///
/// Collection endpoints either put the items array directly in `data` with a sibling
/// `pagination`, or nest both inside `data`; see [`crate::models::pagination::CollectionPayload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<RawPagination>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiFieldError>,
}

impl<T> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
            errors: Vec::new(),
        }
    }

    /// Wrap a page of results with its pagination block.
    pub fn paginated(data: T, pagination: RawPagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::success(data)
        }
    }

    /// Build a `success: false` envelope.
    pub fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            data: None,
            pagination: None,
            errors: Vec::new(),
        }
    }
}

/// Errors surfaced by every network-facing operation of the client.
///
/// None of these are fatal: the caller may always retry or re-authenticate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// No response, or a non-2xx status.
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// An authenticated request came back 401; the session has already been cleared.
    #[error("Session expired")]
    SessionExpired,

    /// 2xx transport but the envelope said `success: false`.
    #[error("Rejected by API: {message}")]
    ApiRejected {
        message: String,
        errors: Vec<ApiFieldError>,
    },

    /// Client-side constraint violation; never reaches the network.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The body did not match any envelope shape the client understands.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl FetchError {
    /// HTTP status associated with the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }

    /// Check if this error forced a logout.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Whether re-issuing the same request could succeed without user changes.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status: None, .. } => true,
            Self::Transport {
                status: Some(s), ..
            } => *s >= 500 || *s == 408 || *s == 429,
            _ => false,
        }
    }

    /// Short message suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { status: None, .. } => "Unable to reach the server".to_string(),
            Self::Transport {
                status: Some(404), ..
            } => "The requested item was not found".to_string(),
            Self::Transport { message, .. } => message.clone(),
            Self::SessionExpired => "Your session has expired, please sign in again".to_string(),
            Self::ApiRejected { message, .. } => message.clone(),
            Self::Validation(msg) => msg.clone(),
            Self::Decode(_) => "The server returned an unexpected response".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for FetchError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field}: {detail}")
            })
            .collect();

        if fields.is_empty() {
            // Struct-level (schema) errors carry no field name.
            fields.push(errors.to_string());
        }
        fields.sort();
        FetchError::Validation(fields.join("; "))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Failures of the durable credential store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}
