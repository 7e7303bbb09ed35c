// src/handlers/users.rs

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::Caller, i18n::Locale},
    models::{
        auth::{ChangeRolePayload, UserListQuery, UserProfile},
        message::MessageResponse,
    },
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(
        ("user_id" = Option<i32>, Query, description = "Id do requisitante (se não houver token)"),
        ("bloco_id_filter" = Option<i32>, Query, description = "Id do bloco (só o síndico escolhe)")
    ),
    responses(
        (status = 200, description = "Usuários ordenados por bloco e apartamento", body = Vec<UserProfile>),
        (status = 403, description = "Requisitante é morador")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    Caller(caller): Caller,
    query: Result<Query<UserListQuery>, QueryRejection>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let Query(query) = query.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    let users = app_state
        .user_service
        .list_users(&caller, query.bloco_id_filter)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(users))
}

// PUT /api/users/{id}/role
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    tag = "Users",
    request_body = ChangeRolePayload,
    params(
        ("id" = i32, Path, description = "Id do usuário alvo"),
        ("user_id" = Option<i32>, Query, description = "Id do requisitante (se não houver token)")
    ),
    responses(
        (status = 200, description = "Role alterada", body = MessageResponse),
        (status = 400, description = "Role inválida, alvo é síndico ou é o próprio requisitante"),
        (status = 403, description = "Requisitante não é síndico"),
        (status = 404, description = "Usuário alvo não encontrado")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn change_role(
    State(app_state): State<AppState>,
    locale: Locale,
    Caller(caller): Caller,
    target_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ChangeRolePayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(target_id) = target_id.map_err(|e| AppError::from(e).to_api_error(&locale))?;
    let Json(payload) = payload.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    app_state
        .user_service
        .change_role(&caller, target_id, payload.new_role)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = if locale.is_english() {
        format!("Role of user {} updated to {}.", target_id, payload.new_role)
    } else {
        format!("Role do usuário {} atualizada para {}.", target_id, payload.new_role)
    };
    Ok(Json(MessageResponse::new(message)))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "Id do usuário alvo"),
        ("user_id" = Option<i32>, Query, description = "Id do requisitante (se não houver token)")
    ),
    responses(
        (status = 200, description = "Usuário e reclamações excluídos", body = MessageResponse),
        (status = 403, description = "Requisitante não é síndico ou alvo é síndico"),
        (status = 404, description = "Usuário alvo não encontrado")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    Caller(caller): Caller,
    target_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(target_id) = target_id.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    app_state
        .user_service
        .delete_user(&caller, target_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = if locale.is_english() {
        format!("User {} and their data were deleted.", target_id)
    } else {
        format!("Usuário {} e seus dados associados foram excluídos com sucesso.", target_id)
    };
    Ok(Json(MessageResponse::new(message)))
}
