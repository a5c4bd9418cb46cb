use crate::models::comment::{Comment, CommentStatus, PostType};
use crate::models::query::FilterQuery;
use crate::services::client::ApiClient;
use crate::services::resource::{ListParams, Resource};

pub const PATH: &str = "comments";
pub const ITEMS_KEY: &str = "comments";

#[derive(Debug, Clone, Default)]
pub struct CommentFilters {
    pub params: ListParams,
    pub status: Option<CommentStatus>,
    pub post_type: Option<PostType>,
    pub post_id: Option<String>,
}

impl CommentFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt("status", self.status.map(|s| s.as_str()))
            .with_opt("postType", self.post_type.map(|t| t.as_str()))
            .with_opt("postId", self.post_id.clone())
    }
}

/// Moderation goes through `FieldToggle::Status`.
pub fn resource(client: &ApiClient) -> Resource<Comment> {
    Resource::nested(client, PATH, ITEMS_KEY)
}
