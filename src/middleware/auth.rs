// src/middleware/auth.rs
//
// Identificação do requisitante: `Authorization: Bearer <jwt>` quando presente,
// senão o `?user_id=` que o front-end já envia.

use axum::{
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Deserialize;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::User,
};

#[derive(Debug, Default, Deserialize)]
struct RequesterQuery {
    user_id: Option<i32>,
}

/// Combina a identidade do token com a informada pelo cliente.
/// Se as duas existirem, precisam apontar para o mesmo usuário.
pub fn merge_identity(token: Option<i32>, declared: Option<i32>) -> Result<Option<i32>, AppError> {
    match (token, declared) {
        (Some(from_token), Some(declared)) if from_token != declared => Err(AppError::IdentityMismatch),
        (Some(from_token), _) => Ok(Some(from_token)),
        (None, declared) => Ok(declared),
    }
}

async fn bearer_subject<S>(parts: &mut Parts, state: &S, app_state: &AppState) -> Result<Option<i32>, AppError>
where
    S: Send + Sync,
{
    match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
        Ok(TypedHeader(Authorization(bearer))) => app_state.auth_service.decode_token(bearer.token()).map(Some),
        Err(rejection) if rejection.is_missing() => Ok(None),
        Err(_) => Err(AppError::InvalidToken),
    }
}

/// Identidade declarada na requisição, ainda não conferida no banco.
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub Option<i32>);

impl<S> FromRequestParts<S> for CallerId
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(locale) = Locale::from_request_parts(parts, state).await;
        let app_state = AppState::from_ref(state);

        let from_token = bearer_subject(parts, state, &app_state)
            .await
            .map_err(|e| e.to_api_error(&locale))?;

        let Query(query) = Query::<RequesterQuery>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::from(e).to_api_error(&locale))?;

        merge_identity(from_token, query.user_id)
            .map(CallerId)
            .map_err(|e| e.to_api_error(&locale))
    }
}

/// Usuário requisitante carregado do banco. O papel usado nas decisões
/// de acesso é sempre o daqui, nunca um flag enviado pelo cliente.
#[derive(Debug, Clone)]
pub struct Caller(pub User);

impl<S> FromRequestParts<S> for Caller
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CallerId(caller_id) = CallerId::from_request_parts(parts, state).await?;
        let Ok(locale) = Locale::from_request_parts(parts, state).await;

        let caller_id = caller_id.ok_or_else(|| AppError::MissingRequester.to_api_error(&locale))?;

        let app_state = AppState::from_ref(state);
        let user = app_state
            .auth_service
            .resolve_caller(caller_id)
            .await
            .map_err(|e| e.to_api_error(&locale))?;

        Ok(Caller(user))
    }
}
