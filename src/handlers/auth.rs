// src/handlers/auth.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::Caller, i18n::Locale},
    models::{
        auth::{LoginResponse, LoginUserPayload, MeResponse, RegisterUserPayload},
        message::MessageResponse,
    },
    services::access::available_views,
};

// POST /api/register
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Morador registrado", body = MessageResponse),
        (status = 400, description = "Bloco/apartamento fora da faixa ou campos inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<RegisterUserPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let id = app_state
        .auth_service
        .register_user(
            &payload.name,
            &payload.email,
            &payload.password,
            payload.block,
            payload.apartment,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.pick("Usuário registrado com sucesso.", "User registered successfully.");
    Ok((StatusCode::CREATED, Json(MessageResponse::created(message, id))))
}

// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Perfil do usuário e token", body = LoginResponse),
        (status = 401, description = "E-mail ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<LoginUserPayload>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let (user, token) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(LoginResponse { profile: user.profile(), token }))
}

// GET /api/me
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Auth",
    params(("user_id" = Option<i32>, Query, description = "Id do requisitante (se não houver token)")),
    responses(
        (status = 200, description = "Perfil e telas disponíveis", body = MeResponse),
        (status = 401, description = "Requisitante desconhecido ou token inválido")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn get_me(Caller(user): Caller) -> Json<MeResponse> {
    Json(MeResponse {
        views: available_views(&user),
        profile: user.profile(),
    })
}
