// src/models/block.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Bloco do condomínio (dado de referência, populado pela migração).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Block {
    #[schema(example = 6)]
    pub id: i32,
    #[schema(example = 5)]
    pub number: i32,
}
