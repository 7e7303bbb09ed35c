// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Complaints ---
        handlers::complaints::list_complaints,
        handlers::complaints::create_complaint,
        handlers::complaints::update_complaint,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::change_role,
        handlers::users::delete_user,

        // --- Blocks ---
        handlers::blocks::list_blocks,
    ),
    components(
        schemas(
            models::auth::Role,
            models::auth::UserProfile,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::LoginResponse,
            models::auth::MeResponse,
            models::auth::ChangeRolePayload,
            models::navigation::View,
            models::complaint::ComplaintStatus,
            models::complaint::Complaint,
            models::complaint::CreateComplaintPayload,
            models::complaint::UpdateComplaintPayload,
            models::block::Block,
            models::message::MessageResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registro, login e perfil"),
        (name = "Complaints", description = "Reclamações dos moradores"),
        (name = "Users", description = "Moradores e papéis (síndico / admin de bloco)"),
        (name = "Blocks", description = "Blocos do condomínio")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
