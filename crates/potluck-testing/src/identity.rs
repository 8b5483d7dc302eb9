//! Mock gateway identity for integration tests.
//!
//! The service reads the viewer from the `x-potluck-user-id` header injected
//! by the gateway. In tests, `TestIdentity` builds that header directly so no
//! real gateway is needed.

use http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

/// Identity injected into test requests.
pub struct TestIdentity {
    pub user_id: Uuid,
}

impl TestIdentity {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("x-potluck-user-id"),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map
    }
}
