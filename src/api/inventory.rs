//! Inventory name matching endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::server::AppState;

use super::skins::SkinDto;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MatchBody {
    /// Raw market listing names, decorations and wear suffixes intact.
    pub names: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatchResponse {
    pub items: Vec<SkinDto>,
}

/// Resolve owned listing names to catalog items
#[utoipa::path(
    post,
    path = "/api/inventory/match",
    request_body = MatchBody,
    responses(
        (status = 200, description = "Catalog items matching the supplied names", body = MatchResponse),
    ),
    tag = "Inventory"
)]
pub async fn handle_inventory_match(
    State(state): State<AppState>,
    Json(body): Json<MatchBody>,
) -> Result<Json<MatchResponse>, ApiError> {
    let items = state.inventory.match_names(&body.names).await?;
    Ok(Json(MatchResponse {
        items: items.into_iter().map(SkinDto::from_item).collect(),
    }))
}
