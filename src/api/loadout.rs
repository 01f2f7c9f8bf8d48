//! Loadout composition endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::color::seed_colors_for_item;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::{LoadoutRequest, Mode};

use super::skins::{parse_seed_colors, SkinDto};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoadoutBody {
    /// 1-3 seed colors as `#rrggbb` hex strings. Mutually exclusive
    /// with `seed_skin_id`.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Seed the scheme from an existing item's dominant color and its
    /// strongest secondary bins.
    #[serde(default)]
    pub seed_skin_id: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    /// Total budget in cents; omit for unconstrained composition.
    #[serde(default)]
    pub max_budget: Option<u32>,
    /// Catalog ids pinned into the loadout.
    #[serde(default)]
    pub locked_ids: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoadoutEntryDto {
    #[serde(flatten)]
    pub skin: SkinDto,
    pub locked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoadoutResponse {
    pub items: Vec<LoadoutEntryDto>,
}

/// Compose a loadout matching a color scheme
#[utoipa::path(
    post,
    path = "/api/loadout",
    request_body = LoadoutBody,
    responses(
        (status = 200, description = "Composed loadout, locked items first", body = LoadoutResponse),
        (status = 400, description = "Malformed seed colors"),
    ),
    tag = "Loadout"
)]
pub async fn handle_loadout(
    State(state): State<AppState>,
    Json(body): Json<LoadoutBody>,
) -> Result<Json<LoadoutResponse>, ApiError> {
    let colors = match (&body.seed_skin_id, body.colors.is_empty()) {
        (Some(_), false) => {
            return Err(ApiError::BadRequest(
                "colors and seed_skin_id are mutually exclusive".into(),
            ))
        }
        (Some(id), true) => {
            let item = state.store.by_id(id).await?.ok_or(ApiError::SkinNotFound)?;
            seed_colors_for_item(&item.dominant_hex, &item.histogram)
        }
        (None, _) => parse_seed_colors(&body.colors.join(","))?,
    };
    let request = LoadoutRequest {
        colors,
        mode: body.mode,
        max_budget: body.max_budget,
        locked_ids: body.locked_ids,
    };
    tracing::debug!(
        colors = ?body.colors,
        mode = ?request.mode,
        budget = ?request.max_budget,
        locked = request.locked_ids.len(),
        "Composing loadout"
    );
    let entries = state.loadout.compose(&request).await?;
    let items = entries
        .into_iter()
        .map(|e| LoadoutEntryDto {
            skin: SkinDto::from_ranked(e.skin),
            locked: e.locked,
        })
        .collect();
    Ok(Json(LoadoutResponse { items }))
}
