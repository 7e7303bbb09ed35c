// src/models/message.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Resposta de sucesso das operações de escrita
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Reclamação registrada com sucesso.")]
    pub message: String,
    /// Id do registro criado, quando houver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), id: None }
    }

    pub fn created(message: impl Into<String>, id: i32) -> Self {
        Self { message: message.into(), id: Some(id) }
    }
}
