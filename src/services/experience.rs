use crate::errors::FetchError;
use crate::models::experience::{Experience, ExperienceStats};
use crate::services::client::ApiClient;
use crate::services::resource::Resource;

pub const PATH: &str = "content/experiences";

/// Experiences filter by the common list params only.
pub fn resource(client: &ApiClient) -> Resource<Experience> {
    Resource::flat(client, PATH)
}

pub async fn stats(client: &ApiClient) -> Result<ExperienceStats, FetchError> {
    resource(client).stats().await
}
