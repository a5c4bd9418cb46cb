//! Skills with category and active filters.

use crate::errors::FetchError;
use crate::models::query::FilterQuery;
use crate::models::skill::{Skill, SkillStats};
use crate::services::client::ApiClient;
use crate::services::resource::{ListParams, Resource};

pub const PATH: &str = "content/skills";

#[derive(Debug, Clone, Default)]
pub struct SkillFilters {
    pub params: ListParams,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl SkillFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt("category", self.category.clone())
            .with_opt("isActive", self.is_active)
    }
}

pub fn resource(client: &ApiClient) -> Resource<Skill> {
    Resource::flat(client, PATH)
}

pub async fn stats(client: &ApiClient) -> Result<SkillStats, FetchError> {
    resource(client).stats().await
}
