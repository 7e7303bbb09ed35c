// src/handlers/complaints.rs

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{merge_identity, Caller, CallerId},
        i18n::Locale,
    },
    models::{
        complaint::{Complaint, CreateComplaintPayload, UpdateComplaintPayload},
        message::MessageResponse,
    },
};

// GET /api/complaints
#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    params(("user_id" = Option<i32>, Query, description = "Id do requisitante (se não houver token)")),
    responses(
        (status = 200, description = "Reclamações visíveis, mais recentes primeiro", body = Vec<Complaint>),
        (status = 400, description = "Requisitante ausente"),
        (status = 401, description = "Requisitante desconhecido")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn list_complaints(
    State(app_state): State<AppState>,
    locale: Locale,
    Caller(caller): Caller,
) -> Result<Json<Vec<Complaint>>, ApiError> {
    let complaints = app_state
        .complaint_service
        .list_complaints(&caller)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(complaints))
}

// POST /api/complaints
#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    request_body = CreateComplaintPayload,
    responses(
        (status = 201, description = "Reclamação registrada", body = MessageResponse),
        (status = 400, description = "Assunto/descrição vazios ou dono ausente"),
        (status = 403, description = "Token e user_id divergentes")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn create_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    CallerId(caller_id): CallerId,
    payload: Result<Json<CreateComplaintPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    // O dono é quem fez a requisição; o user_id do corpo só vale sem token/query
    let owner_id = merge_identity(caller_id, payload.user_id)
        .and_then(|id| id.ok_or(AppError::MissingRequester))
        .map_err(|e| e.to_api_error(&locale))?;

    let owner = app_state
        .auth_service
        .resolve_caller(owner_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let id = app_state
        .complaint_service
        .create_complaint(&owner, &payload.subject, &payload.description)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.pick("Reclamação registrada com sucesso.", "Complaint registered successfully.");
    Ok((StatusCode::CREATED, Json(MessageResponse::created(message, id))))
}

// PUT /api/complaints/{id}
#[utoipa::path(
    put,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    request_body = UpdateComplaintPayload,
    params(
        ("id" = i32, Path, description = "Id da reclamação"),
        ("user_id" = Option<i32>, Query, description = "Id do requisitante (se não houver token)")
    ),
    responses(
        (status = 200, description = "Reclamação atualizada", body = MessageResponse),
        (status = 403, description = "Requisitante não é admin do bloco da reclamação"),
        (status = 404, description = "Reclamação não encontrada")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn update_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    Caller(caller): Caller,
    complaint_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateComplaintPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(complaint_id) = complaint_id.map_err(|e| AppError::from(e).to_api_error(&locale))?;
    let Json(payload) = payload.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    app_state
        .complaint_service
        .update_complaint(&caller, complaint_id, payload.status, payload.admin_comment.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.pick("Reclamação atualizada com sucesso.", "Complaint updated successfully.");
    Ok(Json(MessageResponse::new(message)))
}
