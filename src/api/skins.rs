//! Skin listing, name search, and color search endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::color::target::MAX_SEED_COLORS;
use crate::color::Rgb;
use crate::error::ApiError;
use crate::models::{Category, PriceRange, SkinItem};
use crate::server::AppState;
use crate::services::{Mode, RankedSkin};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// One catalog item as returned by the API. Distance and price are
/// present only where the query computed them.
#[derive(Debug, Serialize, ToSchema)]
pub struct SkinDto {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon: Option<String>,
    pub rarity: String,
    pub category: Category,
    /// Representative display color as `#rrggbb`.
    pub dominant_hex: String,
    /// Cosine distance to the query target, 0 = identical.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    /// Market price range in cents, if currently listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceRange>,
}

impl SkinDto {
    pub fn from_item(item: SkinItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            image: item.image,
            weapon: item.weapon,
            rarity: item.rarity,
            category: item.category,
            dominant_hex: item.dominant_hex,
            distance: None,
            price: None,
        }
    }

    pub fn from_ranked(ranked: RankedSkin) -> Self {
        let mut dto = Self::from_item(ranked.item);
        dto.distance = Some(ranked.distance);
        dto.price = ranked.price;
        dto
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListParams {
    /// Name filter; every whitespace-separated term must match.
    pub name: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ColorSearchParams {
    /// Comma-separated seed colors, e.g. `#ff0000,#00ff00`.
    pub colors: String,
    pub mode: Option<Mode>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SimilarParams {
    pub mode: Option<Mode>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub(crate) fn clamp_paging(
    limit: Option<usize>,
    offset: Option<usize>,
) -> Result<(usize, usize), ApiError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok((limit, offset.unwrap_or(0)))
}

/// Parse a comma-separated list of hex seed colors. Malformed colors
/// are rejected here; the ranking core only ever sees valid RGB.
pub(crate) fn parse_seed_colors(raw: &str) -> Result<Vec<Rgb>, ApiError> {
    let colors: Vec<Rgb> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()?;
    if colors.is_empty() {
        return Err(ApiError::BadRequest("at least one color is required".into()));
    }
    if colors.len() > MAX_SEED_COLORS {
        return Err(ApiError::BadRequest(format!(
            "at most {MAX_SEED_COLORS} colors are allowed"
        )));
    }
    Ok(colors)
}

/// List catalog items, optionally filtered by name
#[utoipa::path(
    get,
    path = "/api/skins",
    params(ListParams),
    responses(
        (status = 200, description = "Matching catalog items", body = [SkinDto]),
        (status = 400, description = "Invalid paging parameters"),
    ),
    tag = "Skins"
)]
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SkinDto>>, ApiError> {
    let (limit, offset) = clamp_paging(params.limit, params.offset)?;
    let name = params.name.unwrap_or_default();
    let items = state.store.by_name_substring(&name, limit, offset).await?;
    Ok(Json(items.into_iter().map(SkinDto::from_item).collect()))
}

/// Rank the catalog against seed colors
#[utoipa::path(
    get,
    path = "/api/skins/search",
    params(ColorSearchParams),
    responses(
        (status = 200, description = "Items ranked by color match", body = [SkinDto]),
        (status = 400, description = "Malformed color or paging parameters"),
    ),
    tag = "Skins"
)]
pub async fn handle_color_search(
    State(state): State<AppState>,
    Query(params): Query<ColorSearchParams>,
) -> Result<Json<Vec<SkinDto>>, ApiError> {
    let (limit, offset) = clamp_paging(params.limit, params.offset)?;
    let colors = parse_seed_colors(&params.colors)?;
    let mode = params.mode.unwrap_or_default();
    tracing::debug!(colors = params.colors, ?mode, "Color search");
    let ranked = state.search.by_colors(&colors, mode, limit, offset).await?;
    Ok(Json(ranked.into_iter().map(SkinDto::from_ranked).collect()))
}

/// Find items similar to an existing catalog item
#[utoipa::path(
    get,
    path = "/api/skins/{id}/similar",
    params(
        ("id" = String, Path, description = "Catalog item id"),
        SimilarParams,
    ),
    responses(
        (status = 200, description = "Similar items, seed excluded", body = [SkinDto]),
        (status = 404, description = "Unknown item id"),
    ),
    tag = "Skins"
)]
pub async fn handle_similar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<Vec<SkinDto>>, ApiError> {
    let (limit, offset) = clamp_paging(params.limit, params.offset)?;
    let mode = params.mode.unwrap_or_default();
    let ranked = state.search.similar_to(&id, mode, limit, offset).await?;
    Ok(Json(ranked.into_iter().map(SkinDto::from_ranked).collect()))
}
