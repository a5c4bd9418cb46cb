//! Site settings, the admin's own profile, and admin user management.

use validator::Validate;

use crate::errors::FetchError;
use crate::models::auth::ChangePasswordRequest;
use crate::models::query::FilterQuery;
use crate::models::settings::{AdminProfile, PortfolioSettings};
use crate::models::user::{UpdateUser, User, UserRole};
use crate::services::client::ApiClient;
use crate::services::resource::{ListParams, Resource};

pub const USERS_PATH: &str = "settings/users";

pub async fn portfolio(client: &ApiClient) -> Result<PortfolioSettings, FetchError> {
    client.get("settings/portfolio").await
}

pub async fn update_portfolio(
    client: &ApiClient,
    settings: &PortfolioSettings,
) -> Result<PortfolioSettings, FetchError> {
    settings.validate()?;
    client.put("settings/portfolio", settings).await
}

pub async fn profile(client: &ApiClient) -> Result<AdminProfile, FetchError> {
    client.get("settings/profile").await
}

pub async fn update_profile(
    client: &ApiClient,
    profile: &AdminProfile,
) -> Result<AdminProfile, FetchError> {
    profile.validate()?;
    client.put("settings/profile", profile).await
}

pub async fn change_password(
    client: &ApiClient,
    request: &ChangePasswordRequest,
) -> Result<(), FetchError> {
    request.validate()?;
    let _: serde_json::Value = client.put("settings/profile/password", request).await?;
    tracing::info!("Password changed");
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    pub params: ListParams,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl UserFilters {
    pub fn to_query(&self) -> FilterQuery {
        self.params
            .to_query()
            .with_opt(
                "role",
                self.role.map(|r| match r {
                    UserRole::SuperAdmin => "super_admin",
                    UserRole::Admin => "admin",
                    UserRole::User => "user",
                }),
            )
            .with_opt(
                "status",
                self.is_active.map(|a| if a { "active" } else { "inactive" }),
            )
    }
}

pub fn users(client: &ApiClient) -> Resource<User> {
    Resource::nested(client, USERS_PATH, "users")
}

/// Partial update of an admin account; uses PUT like every other update.
pub async fn update_user(client: &ApiClient, id: &str, update: &UpdateUser) -> Result<User, FetchError> {
    users(client).update(id, update).await
}
