use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{middleware::i18n::Locale, services::access::Action};

// Motivos de um `InvalidArgument` (400) nas operações de papéis/usuários.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidArgument {
    RoleNotAssignable,
    TargetIsSindico,
    SelfRoleChange,
    SelfDeletion,
}

// Parte da requisição que um extrator do axum não conseguiu ler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPart {
    Body,
    Query,
    Path,
}

// Erros de domínio. A tradução para HTTP acontece em `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Status original da rejeição (400, 413, 415, 422...) é preservado
    #[error("Requisição malformada ({part:?}): {detail}")]
    MalformedRequest {
        part: RequestPart,
        status: StatusCode,
        detail: String,
    },

    #[error("ID do usuário requisitante ausente")]
    MissingRequester,

    #[error("Argumento inválido: {0:?}")]
    InvalidArgument(InvalidArgument),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário requisitante {0} não existe")]
    UnknownRequester(i32),

    #[error("Token e user_id apontam para usuários diferentes")]
    IdentityMismatch,

    #[error("Acesso negado: {0:?}")]
    Forbidden(Action),

    #[error("Fora do escopo do bloco: {0:?}")]
    OutOfScope(Action),

    #[error("Não é permitido excluir um síndico")]
    ProtectedAccount,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Reclamação não encontrada")]
    ComplaintNotFound,

    #[error("Bloco {0} não encontrado")]
    BlockNotFound(i32),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro como ele sai pela API: `{"error": "...", "details": {...}}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

fn forbidden_message(action: Action, en: bool) -> &'static str {
    match (action, en) {
        (Action::ManageComplaint, false) => "Acesso negado. Apenas administradores podem atualizar reclamações.",
        (Action::ManageComplaint, true) => "Access denied. Only administrators can update complaints.",
        (Action::ChangeRole, false) => "Acesso negado. Apenas o síndico pode alterar roles.",
        (Action::ChangeRole, true) => "Access denied. Only the sindico can change roles.",
        (Action::DeleteUser, false) => "Acesso negado. Apenas o síndico pode excluir usuários.",
        (Action::DeleteUser, true) => "Access denied. Only the sindico can delete users.",
        (Action::ListBlocks, false) => "Acesso negado. Apenas o síndico pode listar os blocos.",
        (Action::ListBlocks, true) => "Access denied. Only the sindico can list blocks.",
        (_, false) => "Acesso negado.",
        (_, true) => "Access denied.",
    }
}

fn out_of_scope_message(action: Action, en: bool) -> &'static str {
    match (action, en) {
        (Action::ManageComplaint, false) => "Você só pode editar reclamações do seu bloco.",
        (Action::ManageComplaint, true) => "You can only edit complaints from your own block.",
        (Action::ListUsers, false) => "Administradores de bloco só podem ver moradores do seu próprio bloco.",
        (Action::ListUsers, true) => "Block administrators can only see residents of their own block.",
        (_, false) => "Acesso negado para este bloco.",
        (_, true) => "Access denied for this block.",
    }
}

fn invalid_argument_message(reason: InvalidArgument, en: bool) -> &'static str {
    match (reason, en) {
        (InvalidArgument::RoleNotAssignable, false) => "Nova role inválida. Use \"admin_bloco\" ou \"morador\".",
        (InvalidArgument::RoleNotAssignable, true) => "Invalid new role. Use \"admin_bloco\" or \"morador\".",
        (InvalidArgument::TargetIsSindico, false) => "Não é possível alterar a role de um síndico.",
        (InvalidArgument::TargetIsSindico, true) => "The role of a sindico cannot be changed.",
        (InvalidArgument::SelfRoleChange, false) => "O síndico não pode alterar a própria role.",
        (InvalidArgument::SelfRoleChange, true) => "The sindico cannot change their own role.",
        (InvalidArgument::SelfDeletion, false) => "Você não pode excluir a si mesmo.",
        (InvalidArgument::SelfDeletion, true) => "You cannot delete yourself.",
    }
}

// Os detalhes de validação viram `{campo: [mensagens]}`; a primeira mensagem
// (em ordem de campo) é promovida a `error` para o cliente exibir direto.
fn validation_details(errors: &validator::ValidationErrors) -> (Option<String>, Value) {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut first = None;
    let mut details = serde_json::Map::new();
    for (field, field_errors) in fields {
        let messages: Vec<String> = field_errors
            .iter()
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect();
        if first.is_none() {
            first = messages.first().cloned();
        }
        details.insert(field.to_string(), json!(messages));
    }
    (first, Value::Object(details))
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedRequest { status, .. } => *status,
            AppError::ValidationError(_) | AppError::MissingRequester | AppError::InvalidArgument(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::UnknownRequester(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::IdentityMismatch
            | AppError::Forbidden(_)
            | AppError::OutOfScope(_)
            | AppError::ProtectedAccount => StatusCode::FORBIDDEN,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::UserNotFound | AppError::ComplaintNotFound | AppError::BlockNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let en = locale.is_english();
        let status = self.status();

        let message: String = match self {
            AppError::ValidationError(errors) => {
                let (first, details) = validation_details(errors);
                let generic = locale.pick("Um ou mais campos são inválidos.", "One or more fields are invalid.");
                return ApiError {
                    status,
                    error: first.unwrap_or_else(|| generic.to_string()),
                    details: Some(details),
                };
            }
            AppError::MalformedRequest { part, detail, .. } => {
                let prefix = match part {
                    RequestPart::Body => locale.pick("Corpo da requisição inválido", "Invalid request body"),
                    RequestPart::Query => locale.pick("Parâmetros de consulta inválidos", "Invalid query parameters"),
                    RequestPart::Path => locale.pick("Parâmetro de rota inválido", "Invalid path parameter"),
                };
                format!("{}: {}", prefix, detail)
            }
            AppError::MissingRequester => locale
                .pick("ID de usuário requisitante é obrigatório.", "Requesting user id is required.")
                .into(),
            AppError::InvalidArgument(reason) => invalid_argument_message(*reason, en).into(),
            AppError::InvalidCredentials => locale.pick("E-mail ou senha inválidos.", "Invalid e-mail or password.").into(),
            AppError::InvalidToken => locale
                .pick("Token de autenticação inválido ou expirado.", "Invalid or expired authentication token.")
                .into(),
            AppError::UnknownRequester(_) => locale
                .pick("Usuário requisitante não autenticado.", "Requesting user is not authenticated.")
                .into(),
            AppError::IdentityMismatch => locale
                .pick("O token não corresponde ao user_id informado.", "The token does not match the given user_id.")
                .into(),
            AppError::Forbidden(action) => forbidden_message(*action, en).into(),
            AppError::OutOfScope(action) => out_of_scope_message(*action, en).into(),
            AppError::ProtectedAccount => locale
                .pick("Não é permitido excluir um Super Admin.", "A super admin cannot be deleted.")
                .into(),
            AppError::EmailAlreadyExists => locale.pick("Este e-mail já está cadastrado.", "This e-mail is already registered.").into(),
            AppError::UserNotFound => locale.pick("Usuário não encontrado.", "User not found.").into(),
            AppError::ComplaintNotFound => locale.pick("Reclamação não encontrada.", "Complaint not found.").into(),
            AppError::BlockNotFound(number) => {
                if en {
                    format!("Block {number} not found.")
                } else {
                    format!("Bloco {number} não encontrado.")
                }
            }
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                locale.pick("Ocorreu um erro inesperado.", "An unexpected error occurred.").into()
            }
        };

        ApiError::new(status, message)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error(&Locale::default())
    }
}

// Rejeições dos extratores do axum viram `MalformedRequest`, que passa pelo
// mesmo `to_api_error` (e idioma) dos erros de domínio.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest {
            part: RequestPart::Body,
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::MalformedRequest {
            part: RequestPart::Query,
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedRequest {
            part: RequestPart::Path,
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 1, max = 40, message = "O bloco deve estar entre 1 e 40."))]
        block: i32,
        #[validate(length(min = 1, message = "O nome é obrigatório."))]
        name: String,
    }

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden(Action::ListUsers).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::OutOfScope(Action::ManageComplaint).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::EmailAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::ComplaintNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidArgument(InvalidArgument::SelfRoleChange).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::MissingRequester.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn malformed_request_keeps_status_and_follows_locale() {
        let err = AppError::MalformedRequest {
            part: RequestPart::Body,
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            detail: "Expected request with `Content-Type: application/json`".into(),
        };
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let en = err.to_api_error(&Locale("en".into()));
        assert_eq!(en.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(en.error.starts_with("Invalid request body: "));

        let pt = err.to_api_error(&Locale::default());
        assert!(pt.error.starts_with("Corpo da requisição inválido: "));
    }

    #[test]
    fn query_rejection_is_a_bad_request() {
        let uri: axum::http::Uri = "/api/users?user_id=abc".parse().unwrap();
        let rejection = axum::extract::Query::<std::collections::HashMap<String, i32>>::try_from_uri(&uri)
            .unwrap_err();
        let err = AppError::from(rejection);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, AppError::MalformedRequest { part: RequestPart::Query, .. }));
    }

    #[test]
    fn messages_follow_locale() {
        let pt = AppError::UserNotFound.to_api_error(&Locale::default());
        assert_eq!(pt.error, "Usuário não encontrado.");
        let en = AppError::UserNotFound.to_api_error(&Locale("en".into()));
        assert_eq!(en.error, "User not found.");
        assert_eq!(en.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::InternalServerError(anyhow::anyhow!("senha do banco vazou"));
        let api = err.to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("senha do banco"));
    }

    #[test]
    fn validation_error_promotes_first_field_message() {
        let errors = Sample { block: 41, name: String::new() }.validate().unwrap_err();
        let api = AppError::ValidationError(errors).to_api_error(&Locale::default());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "O bloco deve estar entre 1 e 40.");
        let details = api.details.expect("details");
        assert_eq!(details["name"][0], "O nome é obrigatório.");
    }
}
