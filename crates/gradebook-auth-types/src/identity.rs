//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use gradebook_domain::user::UserRole;

use crate::{USER_ID_HEADER, USER_ROLE_HEADER};

/// User identity injected by the gateway via `x-gradebook-user-id` and `x-gradebook-user-role`.
///
/// Returns 401 if either header is absent, the id is not a UUID, or the role is unknown.
/// Permission decisions (403) are made by the service after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send`; values are read
    // synchronously so the returned future does not borrow `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        let user_role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok())
            .and_then(UserRole::from_u8);

        async move {
            match (user_id, user_role) {
                (Some(user_id), Some(user_role)) => Ok(Self { user_id, user_role }),
                _ => {
                    tracing::debug!("rejecting request without valid identity headers");
                    Err(StatusCode::UNAUTHORIZED)
                }
            }
        }
    }
}
