use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::lens::lens_embeds;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LensEmbedsDto {
    /// Raw HTML snippets, one per lens.
    pub(crate) embeds: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/getar",
    tag = "lenses",
    responses(
        (status = 200, description = "AR lens embed snippets", body = LensEmbedsDto)
    )
)]
pub(crate) async fn get_lenses() -> Json<LensEmbedsDto> {
    Json(LensEmbedsDto {
        embeds: lens_embeds(),
    })
}
