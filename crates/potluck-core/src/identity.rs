//! Gateway-injected identity extractors.
//!
//! The service sits behind a gateway that authenticates requests and injects
//! the viewer's id as the `x-potluck-user-id` header. Credentials and token
//! issuance never reach this service.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-potluck-user-id";

/// Authenticated viewer identity. Rejects with 401 when the header is
/// absent or is not a valid UUID.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
}

/// Optional viewer identity for endpoints that are readable anonymously.
///
/// An absent header is an anonymous viewer; a present but malformed header
/// still rejects with 401 (a gateway never emits garbage, so garbage means
/// the request did not come through the gateway).
#[derive(Debug, Clone, Copy)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.map(|identity| identity.user_id)
    }
}

// axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
// In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
// causing E0195. Fix: extract values synchronously, return a 'static async move block.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { user_id })
        }
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .map(|v| v.to_str().map(str::to_owned));

        async move {
            match header {
                None => Ok(Self(None)),
                Some(value) => {
                    let user_id = value
                        .ok()
                        .and_then(|s| s.parse::<Uuid>().ok())
                        .ok_or(StatusCode::UNAUTHORIZED)?;
                    Ok(Self(Some(Identity { user_id })))
                }
            }
        }
    }
}
