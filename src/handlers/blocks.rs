// src/handlers/blocks.rs

use axum::{extract::State, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::Caller, i18n::Locale},
    models::block::Block,
};

// GET /api/blocks
#[utoipa::path(
    get,
    path = "/api/blocks",
    tag = "Blocks",
    params(("user_id" = Option<i32>, Query, description = "Id do requisitante (se não houver token)")),
    responses(
        (status = 200, description = "Blocos ordenados pelo número", body = Vec<Block>),
        (status = 403, description = "Requisitante não é síndico")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn list_blocks(
    State(app_state): State<AppState>,
    locale: Locale,
    Caller(caller): Caller,
) -> Result<Json<Vec<Block>>, ApiError> {
    let blocks = app_state
        .block_service
        .list_blocks(&caller)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(blocks))
}
