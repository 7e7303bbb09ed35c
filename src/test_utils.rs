// src/test_utils.rs

use std::time::Duration;

use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    config::AppState,
    models::auth::{Role, User},
    services::auth::AuthSettings,
};

pub const TEST_JWT_SECRET: &str = "segredo-de-teste";

pub fn test_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl: chrono::Duration::hours(1),
        bcrypt_cost: 4,
    }
}

/// Estado com pool preguiçosa: nada conecta até a primeira query.
/// Serve para os caminhos que falham antes de tocar o banco.
pub fn lazy_state() -> AppState {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://localhost/condominio_test")
        .expect("URL de teste inválida");
    AppState::new(pool, test_settings())
}

pub fn state_from_pool(pool: PgPool) -> AppState {
    AppState::new(pool, test_settings())
}

pub fn registration(name: &str, email: &str, block: i32, apartment: i32) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": "segredo123",
        "block": block,
        "apartment": apartment,
    })
}

/// Registra um usuário direto pelo serviço e, se preciso, promove.
pub async fn seed_user(state: &AppState, email: &str, block: i32, apartment: i32, role: Role) -> User {
    state
        .auth_service
        .register_user("Usuário de Teste", email, "segredo123", block, apartment)
        .await
        .expect("registro falhou");

    state
        .user_service
        .set_role_by_email(email, role)
        .await
        .expect("promoção falhou")
}
