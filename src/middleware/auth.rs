//! Credential attachment and 401 handling for outgoing requests.

use reqwest::{RequestBuilder, StatusCode, Url};

use crate::errors::FetchError;
use crate::session::SessionContext;

/// Whether the request needs the signed-in admin's credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    /// Sign-in and other public calls; never carries a token.
    Anonymous,
}

/// Whether `target` is served from the same origin as the configured API.
pub fn targets_api(target: &Url, api_base: &Url) -> bool {
    target.origin() == api_base.origin()
}

/// Attach `Authorization: Bearer <token>` when the request is authenticated, aimed at
/// the API origin, and a token is held.
pub fn attach_credentials(
    request: RequestBuilder,
    target: &Url,
    api_base: &Url,
    access: Access,
    session: &SessionContext,
) -> RequestBuilder {
    if access == Access::Anonymous || !targets_api(target, api_base) {
        return request;
    }
    match session.token() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Map a 401 on an authenticated call to a forced sign-out.
///
/// Returns `Some(SessionExpired)` after clearing the session, `None` for any other status.
pub fn check_unauthorized(
    status: StatusCode,
    access: Access,
    session: &SessionContext,
) -> Option<FetchError> {
    if status != StatusCode::UNAUTHORIZED || access == Access::Anonymous {
        return None;
    }
    tracing::warn!("API rejected credential, ending session");
    session.invalidate();
    Some(FetchError::SessionExpired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{AdminIdentity, UserRole};
    use crate::session::SessionStatus;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn signed_in() -> SessionContext {
        let session = SessionContext::in_memory();
        session.login(
            "secret".to_string(),
            AdminIdentity {
                id: "a1".to_string(),
                username: "root".to_string(),
                email: "root@example.com".to_string(),
                role: UserRole::Admin,
                profile_image: None,
            },
        );
        session
    }

    #[test]
    fn origin_match_ignores_path() {
        let base = url("https://api.example.com/api/v1/");
        assert!(targets_api(&url("https://api.example.com/api/v1/content/blogs"), &base));
        assert!(targets_api(&url("https://api.example.com/other"), &base));
        assert!(!targets_api(&url("http://api.example.com/api/v1/x"), &base));
        assert!(!targets_api(&url("https://cdn.example.com/img.png"), &base));
        assert!(!targets_api(&url("https://api.example.com:8443/api/v1/x"), &base));
    }

    #[test]
    fn bearer_only_for_api_origin() {
        let session = signed_in();
        let base = url("https://api.example.com/api/v1/");
        let client = reqwest::Client::new();

        let api = url("https://api.example.com/api/v1/content/blogs");
        let req = attach_credentials(client.get(api.clone()), &api, &base, Access::Authenticated, &session)
            .build()
            .unwrap();
        assert_eq!(
            req.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer secret"
        );

        let foreign = url("https://cdn.example.com/a.png");
        let req = attach_credentials(client.get(foreign.clone()), &foreign, &base, Access::Authenticated, &session)
            .build()
            .unwrap();
        assert!(req.headers().get(reqwest::header::AUTHORIZATION).is_none());

        let login = url("https://api.example.com/api/v1/auth/login");
        let req = attach_credentials(client.post(login.clone()), &login, &base, Access::Anonymous, &session)
            .build()
            .unwrap();
        assert!(req.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn unauthorized_invalidates_only_authenticated_calls() {
        let session = signed_in();
        assert!(check_unauthorized(StatusCode::UNAUTHORIZED, Access::Anonymous, &session).is_none());
        assert!(session.is_authenticated());

        assert!(check_unauthorized(StatusCode::FORBIDDEN, Access::Authenticated, &session).is_none());
        assert!(session.is_authenticated());

        let err = check_unauthorized(StatusCode::UNAUTHORIZED, Access::Authenticated, &session);
        assert_eq!(err, Some(FetchError::SessionExpired));
        assert!(!session.is_authenticated());
        assert_eq!(session.status(), SessionStatus::Expired);
    }
}
