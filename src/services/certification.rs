use crate::errors::FetchError;
use crate::models::certification::{Certification, CertificationStats};
use crate::models::query::FilterQuery;
use crate::services::client::ApiClient;
use crate::services::resource::{ListParams, Resource};

pub const PATH: &str = "content/certifications";

#[derive(Debug, Clone, Default)]
pub struct CertificationFilters {
    pub params: ListParams,
    pub is_active: Option<bool>,
}

impl CertificationFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params.to_query().with_opt("isActive", self.is_active)
    }
}

pub fn resource(client: &ApiClient) -> Resource<Certification> {
    Resource::flat(client, PATH)
}

pub async fn stats(client: &ApiClient) -> Result<CertificationStats, FetchError> {
    resource(client).stats().await
}
