//! Blog posts: list, CRUD, publish toggle and stats.

use crate::errors::FetchError;
use crate::models::blog::{Blog, BlogStats};
use crate::models::query::FilterQuery;
use crate::services::client::ApiClient;
use crate::services::resource::{FieldToggle, ListParams, Resource};

pub const PATH: &str = "content/blogs";

/// Filters for listing blog posts.
#[derive(Debug, Clone, Default)]
pub struct BlogFilters {
    pub params: ListParams,
    pub category: Option<String>,
    pub published: Option<bool>,
}

impl BlogFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt("category", self.category.clone())
            .with_opt("published", self.published)
    }
}

pub fn resource(client: &ApiClient) -> Resource<Blog> {
    Resource::flat(client, PATH)
}

/// Flip the published flag; returns the post as the server now reports it.
pub async fn publish(client: &ApiClient, blog: &Blog) -> Result<Blog, FetchError> {
    let patch = resource(client).toggle(&blog.id, &FieldToggle::Published).await?;
    crate::models::apply_patch(blog, &patch)
}

pub async fn stats(client: &ApiClient) -> Result<BlogStats, FetchError> {
    resource(client).stats().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_to_query() {
        let filters = BlogFilters {
            params: ListParams::page(3),
            category: Some("rust".to_string()),
            published: Some(false),
        };
        let built = filters.to_query().build();
        assert_eq!(built.get("page"), Some("3"));
        assert_eq!(built.get("category"), Some("rust"));
        assert_eq!(built.get("published"), Some("false"));
    }
}
