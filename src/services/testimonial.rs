use crate::errors::FetchError;
use crate::models::query::FilterQuery;
use crate::models::testimonial::{Testimonial, TestimonialStats};
use crate::services::client::ApiClient;
use crate::services::resource::{ListParams, Resource};

pub const PATH: &str = "content/testimonials";

#[derive(Debug, Clone, Default)]
pub struct TestimonialFilters {
    pub params: ListParams,
    pub verified: Option<bool>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl TestimonialFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt("verified", self.verified)
            .with_opt("featured", self.featured)
            .with_opt("isActive", self.is_active)
    }
}

/// Testimonials support the verify, feature and active toggles.
pub fn resource(client: &ApiClient) -> Resource<Testimonial> {
    Resource::flat(client, PATH)
}

pub async fn stats(client: &ApiClient) -> Result<TestimonialStats, FetchError> {
    resource(client).stats().await
}
