use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, header},
};
use serde::Serialize;

use potluck_core::identity::MaybeIdentity;

use crate::domain::repository::RecipeRepository as _;
use crate::error::ApiError;
use crate::handlers::recipe::{RecipeResponse, projection};
use crate::state::AppState;

/// Host the short link should point at. Behind the gateway the public name
/// travels in `x-forwarded-host`; plain `Host` covers direct access, and
/// the configured host is the last resort.
fn link_host(headers: &HeaderMap, fallback: &str) -> String {
    headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|value| value.to_str().ok())
        .unwrap_or(fallback)
        .to_owned()
}

// ── GET /api/recipes/{id}/get-link ───────────────────────────────────────────

#[derive(Serialize)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

pub async fn get_recipe_link(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<ShortLinkResponse>, ApiError> {
    state
        .recipe_repo()
        .find_by_id(id)
        .await?
        .ok_or(ApiError::RecipeNotFound)?;

    let host = link_host(&headers, &state.public_host);
    Ok(Json(ShortLinkResponse {
        short_link: format!("{host}/s/{id}"),
    }))
}

// ── GET /s/{id} ──────────────────────────────────────────────────────────────

/// Short links resolve to the same projection as the canonical recipe URL.
pub async fn resolve_short_link(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let view = projection(&state).execute(identity.user_id(), id).await?;
    Ok(Json(view.into()))
}
