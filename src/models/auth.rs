// src/models/auth.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::navigation::View;

// Hierarquia de papéis: a ordem de declaração define a comparação
// (morador < admin_bloco < sindico).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Morador,
    AdminBloco,
    Sindico,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Morador => "morador",
            Role::AdminBloco => "admin_bloco",
            Role::Sindico => "sindico",
        }
    }

    pub fn is_admin(&self) -> bool {
        *self >= Role::AdminBloco
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("role desconhecida: '{0}' (use morador, admin_bloco ou sindico)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "morador" => Ok(Role::Morador),
            "admin_bloco" => Ok(Role::AdminBloco),
            "sindico" => Ok(Role::Sindico),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

// Representa um usuário vindo do banco de dados (já com o número do bloco).
// Nunca é serializado diretamente: a saída pública é o `UserProfile`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub block_id: i32,
    pub block: i32,
    pub apartment: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            is_admin: self.is_admin(),
            block_id: self.block_id,
            block: self.block,
            apartment: self.apartment,
        }
    }
}

/// Perfil público de um usuário (login, `/me` e listagem de usuários).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[schema(example = "maria@exemplo.com")]
    pub email: String,
    pub role: Role,
    pub is_admin: bool,
    #[schema(example = 6)]
    pub block_id: i32,
    /// Número do bloco (não o id).
    #[schema(example = 5)]
    pub block: i32,
    #[schema(example = 10)]
    pub apartment: i32,
}

// Dados para registro de um novo morador
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[serde(alias = "nome")]
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Maria Souza")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "maria@exemplo.com")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[serde(alias = "bloco")]
    #[validate(range(min = 1, max = 40, message = "O bloco deve estar entre 1 e 40."))]
    #[schema(example = 5)]
    pub block: i32,

    #[serde(alias = "apartamento")]
    #[validate(range(min = 1, max = 126, message = "O apartamento deve estar entre 1 e 126."))]
    #[schema(example = 10)]
    pub apartment: i32,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "maria@exemplo.com")]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta do login: perfil + token para as próximas requisições
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub token: String,
}

// Resposta de /api/me
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub views: Vec<View>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeRolePayload {
    #[schema(example = "admin_bloco")]
    pub new_role: Role,
}

// `?bloco_id_filter=` (vazio) é o mesmo que não filtrar
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub bloco_id_filter: Option<i32>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub exp: usize,
    pub iat: usize,
}
