//! Mock identity helpers for HTTP tests.
//!
//! Services behind the gateway receive `x-gradebook-user-id` + `x-gradebook-user-role`
//! headers. `MockAuth` builds those headers directly so no gateway is needed.

use http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use gradebook_auth_types::{USER_ID_HEADER, USER_ROLE_HEADER};
use gradebook_domain::user::UserRole;

/// Identity injected into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn admin() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Admin)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in self.header_pairs() {
            map.insert(name, value);
        }
        map
    }

    /// Header name/value pairs, for clients that add headers one at a time.
    pub fn header_pairs(&self) -> [(HeaderName, HeaderValue); 2] {
        [
            (
                HeaderName::from_static(USER_ID_HEADER),
                HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
            ),
            (
                HeaderName::from_static(USER_ROLE_HEADER),
                HeaderValue::from(u16::from(self.user_role.as_u8())),
            ),
        ]
    }
}
