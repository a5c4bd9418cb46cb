//! Uploaded media assets under `media/`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Entity;

/// One object in the media bucket, keyed by its storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct MediaFile {
    pub key: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(rename = "url")]
    pub url: String,
}

impl Entity for MediaFile {
    fn id(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredObject {
    pub url: String,
    pub key: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessedVariant {
    pub size: String,
    pub url: String,
    pub key: String,
}

/// `data` of an image upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResult {
    pub original: StoredObject,
    #[serde(default)]
    pub processed: Vec<ProcessedVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    pub signed_url: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaStatistics {
    pub total_files: u64,
    pub total_size: u64,
    #[serde(default)]
    pub by_type: HashMap<String, u64>,
    #[serde(default)]
    pub by_folder: HashMap<String, u64>,
}
