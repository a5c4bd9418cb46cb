//! Sign-in and sign-out.

use validator::Validate;

use crate::errors::FetchError;
use crate::models::auth::{LoginCredentials, LoginData};
use crate::models::user::AdminIdentity;
use crate::services::client::ApiClient;

/// Exchange credentials for a token and record the session.
///
/// A 401 here means wrong credentials, not an expired session, so it comes back as a
/// transport error and leaves any current session alone.
pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> Result<AdminIdentity, FetchError> {
    credentials.validate()?;
    let data: LoginData = client.post_anonymous("auth/login", credentials).await?;
    client.session().login(data.token, data.admin.clone());
    Ok(data.admin)
}

/// Clear the stored credential. No request is made.
pub fn logout(client: &ApiClient) {
    client.session().logout();
}
