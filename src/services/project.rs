//! Portfolio projects.

use crate::models::project::{Project, ProjectType};
use crate::models::query::FilterQuery;
use crate::services::client::ApiClient;
use crate::services::resource::{ListParams, Resource};

pub const PATH: &str = "content/projects";

#[derive(Debug, Clone, Default)]
pub struct ProjectFilters {
    pub params: ListParams,
    pub project_type: Option<ProjectType>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl ProjectFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt(
                "type",
                self.project_type.map(|t| match t {
                    ProjectType::Main => "main",
                    ProjectType::Mini => "mini",
                }),
            )
            .with_opt("featured", self.featured)
            .with_opt("isActive", self.is_active)
    }
}

/// Projects support `FieldToggle::Featured` and `FieldToggle::Active`.
pub fn resource(client: &ApiClient) -> Resource<Project> {
    Resource::flat(client, PATH)
}
