use crate::errors::FetchError;
use crate::models::education::{Education, EducationStats};
use crate::services::client::ApiClient;
use crate::services::resource::Resource;

pub const PATH: &str = "content/education";

pub fn resource(client: &ApiClient) -> Resource<Education> {
    Resource::flat(client, PATH)
}

pub async fn stats(client: &ApiClient) -> Result<EducationStats, FetchError> {
    resource(client).stats().await
}
