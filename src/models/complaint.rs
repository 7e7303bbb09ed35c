// src/models/complaint.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// Ciclo de vida de uma reclamação. Qualquer transição é permitida
// para um administrador autorizado.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "complaint_status")]
pub enum ComplaintStatus {
    #[default]
    #[sqlx(rename = "aberto")]
    #[serde(rename = "aberto")]
    Aberto,
    #[sqlx(rename = "em análise")]
    #[serde(rename = "em análise")]
    EmAnalise,
    #[sqlx(rename = "fechado")]
    #[serde(rename = "fechado")]
    Fechado,
}

/// Reclamação com os dados do morador que a criou.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Complaint {
    #[schema(example = 42)]
    pub id: i32,
    pub user_id: i32,
    #[schema(example = "Barulho após as 22h")]
    pub subject: String,
    pub description: String,
    pub status: ComplaintStatus,
    #[schema(example = "Resolvido")]
    pub admin_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    /// Número do bloco do morador.
    pub user_block: i32,
    pub user_apartment: i32,
}

// O mínimo necessário para decidir quem pode alterar uma reclamação
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ComplaintOwnership {
    pub id: i32,
    pub user_id: i32,
    pub block_id: i32,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message("O campo não pode ficar em branco.".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComplaintPayload {
    /// Dono da reclamação quando a requisição não traz token nem `user_id` na query.
    #[schema(example = 12)]
    pub user_id: Option<i32>,

    #[validate(length(min = 1, message = "O assunto é obrigatório."), custom(function = "not_blank"))]
    #[schema(example = "Barulho após as 22h")]
    pub subject: String,

    #[validate(length(min = 1, message = "A descrição é obrigatória."), custom(function = "not_blank"))]
    #[schema(example = "Som alto no apartamento 52 todas as noites.")]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateComplaintPayload {
    pub status: ComplaintStatus,
    #[serde(default)]
    #[schema(example = "Resolvido")]
    pub admin_comment: Option<String>,
}
