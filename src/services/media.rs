//! Media bucket: listing, uploads, signed URLs and deletion by storage key.

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::errors::FetchError;
use crate::models::media::{MediaFile, MediaStatistics, SignedUrl, StoredObject, UploadResult};
use crate::models::query::FilterQuery;
use crate::services::client::ApiClient;
use crate::services::resource::Resource;

pub const FILES_PATH: &str = "media/files";

/// Default page size of the media browser.
pub const DEFAULT_LIMIT: u32 = 20;

pub fn files(client: &ApiClient) -> Resource<MediaFile> {
    Resource::nested(client, FILES_PATH, "files")
}

/// Query for one page of files under an optional key prefix.
pub fn files_query(page: u32, limit: u32, prefix: Option<&str>) -> FilterQuery {
    FilterQuery::new()
        .with("page", page.max(1))
        .with("limit", limit.max(1))
        .with_opt("prefix", prefix.filter(|p| !p.is_empty()))
}

/// A file to upload: its name and contents.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    fn part(self) -> Part {
        Part::bytes(self.bytes).file_name(self.name)
    }
}

/// Files of mixed kinds sent in one request.
#[derive(Debug, Clone, Default)]
pub struct MediaBundle {
    pub images: Vec<UploadFile>,
    pub videos: Vec<UploadFile>,
    pub documents: Vec<UploadFile>,
}

impl MediaBundle {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty() && self.documents.is_empty()
    }
}

fn with_folder(form: Form, folder: Option<&str>) -> Form {
    match folder.filter(|f| !f.is_empty()) {
        Some(folder) => form.text("folder", folder.to_string()),
        None => form,
    }
}

/// Upload one image, optionally into `folder`.
pub async fn upload_image(
    client: &ApiClient,
    file: UploadFile,
    folder: Option<&str>,
) -> Result<UploadResult, FetchError> {
    let form = with_folder(Form::new().part("image", file.part()), folder);
    let result: UploadResult = client.post_multipart("media/images", form).await?;
    tracing::info!(key = %result.original.key, variants = result.processed.len(), "Uploaded image");
    Ok(result)
}

/// Upload several images in one request; `max_count` caps how many the server accepts.
pub async fn upload_images(
    client: &ApiClient,
    files: Vec<UploadFile>,
    folder: Option<&str>,
    max_count: Option<u32>,
) -> Result<Vec<StoredObject>, FetchError> {
    if files.is_empty() {
        return Err(FetchError::Validation("No images selected".to_string()));
    }
    let mut form = files
        .into_iter()
        .fold(Form::new(), |form, file| form.part("images", file.part()));
    form = with_folder(form, folder);
    if let Some(max) = max_count.filter(|m| *m > 0) {
        form = form.text("maxCount", max.to_string());
    }

    let stored: Vec<StoredObject> = client.post_multipart("media/images/batch", form).await?;
    tracing::info!(count = stored.len(), "Uploaded image batch");
    Ok(stored)
}

/// Upload images, videos and documents together. The server's reply is passed through.
pub async fn upload_bundle(
    client: &ApiClient,
    bundle: MediaBundle,
    folder: Option<&str>,
) -> Result<Value, FetchError> {
    if bundle.is_empty() {
        return Err(FetchError::Validation("No files selected".to_string()));
    }
    let MediaBundle {
        images,
        videos,
        documents,
    } = bundle;
    let parts = images
        .into_iter()
        .map(|f| ("images", f))
        .chain(videos.into_iter().map(|f| ("videos", f)))
        .chain(documents.into_iter().map(|f| ("documents", f)));
    let form = parts.fold(Form::new(), |form, (field, file)| form.part(field, file.part()));

    client.post_multipart(FILES_PATH, with_folder(form, folder)).await
}

pub async fn signed_url(
    client: &ApiClient,
    key: &str,
    expires_in_secs: Option<u64>,
) -> Result<SignedUrl, FetchError> {
    let query = FilterQuery::new()
        .with_opt("expiresIn", expires_in_secs.and_then(|s| i64::try_from(s).ok()))
        .build();
    let url = client.keyed_endpoint(FILES_PATH, key, Some("signed-url"))?;
    client.get_url(url, &query).await
}

/// Delete by storage key.
pub async fn delete_file(client: &ApiClient, key: &str) -> Result<(), FetchError> {
    client.delete_url(client.keyed_endpoint(FILES_PATH, key, None)?).await
}

pub async fn statistics(client: &ApiClient) -> Result<MediaStatistics, FetchError> {
    client.get("media/statistics").await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::config::ClientConfig;
    use crate::session::SessionContext;

    fn offline_client() -> ApiClient {
        ApiClient::new(
            &ClientConfig::for_api("http://127.0.0.1:9/api"),
            Arc::new(SessionContext::in_memory()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn empty_uploads_never_reach_the_network() {
        let client = offline_client();
        assert!(matches!(
            upload_images(&client, Vec::new(), Some("blog"), None).await,
            Err(FetchError::Validation(_))
        ));
        assert!(matches!(
            upload_bundle(&client, MediaBundle::default(), None).await,
            Err(FetchError::Validation(_))
        ));
    }

    #[test]
    fn files_query_skips_empty_prefix() {
        let built = files_query(0, DEFAULT_LIMIT, Some("")).build();
        assert_eq!(built.get("page"), Some("1"));
        assert_eq!(built.get("limit"), Some("20"));
        assert_eq!(built.get("prefix"), None);
    }
}
