// src/models/navigation.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Telas que o front-end pode exibir. Não carrega regra de negócio:
// quem decide o que aparece é `services::access::available_views`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Complaints,
    NewComplaint,
    ManageComplaints,
    ManageUsers,
    BlockFilter,
}
