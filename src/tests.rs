// src/tests.rs
//
// Testes de ponta a ponta pelo router. Os do primeiro bloco não tocam o
// banco (falham antes da primeira query); os `#[sqlx::test]` precisam de
// DATABASE_URL apontando para um Postgres e rodam com `--ignored`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{routes::create_router, test_utils::*};

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
    request
}

// --- Sem banco ---

#[tokio::test]
async fn health_check_answers_ok() {
    let app = create_router(lazy_state());
    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_rejects_block_out_of_range() {
    let app = create_router(lazy_state());
    let body = registration("Ana", "ana@exemplo.com", 41, 10);

    let (status, body) = send(app, json_request(Method::POST, "/api/register", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "O bloco deve estar entre 1 e 40.");
    assert!(body["details"]["block"].is_array());
}

#[tokio::test]
async fn register_rejects_apartment_out_of_range() {
    let app = create_router(lazy_state());
    let body = json!({
        "nome": "Ana",
        "email": "ana@exemplo.com",
        "password": "segredo123",
        "bloco": 5,
        "apartamento": 127,
    });

    let (status, body) = send(app, json_request(Method::POST, "/api/register", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "O apartamento deve estar entre 1 e 126.");
}

#[tokio::test]
async fn login_rejects_malformed_email() {
    let app = create_router(lazy_state());
    let body = json!({ "email": "sem-arroba", "password": "x" });

    let (status, body) = send(app, json_request(Method::POST, "/api/login", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "O e-mail fornecido é inválido.");
}

#[tokio::test]
async fn listing_users_requires_a_requester() {
    let app = create_router(lazy_state());

    let (status, body) = send(app, get("/api/users")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID de usuário requisitante é obrigatório.");
}

#[tokio::test]
async fn missing_requester_message_follows_accept_language() {
    let app = create_router(lazy_state());
    let mut request = get("/api/complaints");
    request
        .headers_mut()
        .insert(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9".parse().unwrap());

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Requesting user id is required.");
}

#[tokio::test]
async fn invalid_bearer_token_is_unauthorized() {
    let app = create_router(lazy_state());

    let (status, body) = send(app.clone(), with_bearer(get("/api/me"), "nem-um-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token de autenticação inválido ou expirado.");

    let mut request = get("/api/me");
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Basic dXNlcjpzZW5oYQ==".parse().unwrap());
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_and_query_identity_must_agree() {
    let state = lazy_state();
    let token = state.auth_service.create_token(1).unwrap();
    let app = create_router(state);

    let (status, body) = send(app, with_bearer(get("/api/complaints?user_id=2"), &token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "O token não corresponde ao user_id informado.");
}

#[tokio::test]
async fn complaint_with_blank_subject_is_rejected() {
    let app = create_router(lazy_state());
    let body = json!({ "user_id": 1, "subject": "   ", "description": "Som alto" });

    let (status, body) = send(app, json_request(Method::POST, "/api/complaints", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["subject"].is_array());
}

#[tokio::test]
async fn complaint_without_owner_is_rejected() {
    let app = create_router(lazy_state());
    let body = json!({ "subject": "Barulho", "description": "Som alto" });

    let (status, body) = send(app, json_request(Method::POST, "/api/complaints", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID de usuário requisitante é obrigatório.");
}

#[tokio::test]
async fn malformed_json_gets_json_error() {
    let app = create_router(lazy_state());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ não é json"))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Corpo da requisição inválido"));
}

#[tokio::test]
async fn missing_content_type_keeps_415_and_locale() {
    let app = create_router(lazy_state());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::ACCEPT_LANGUAGE, "en")
        .body(Body::from(r#"{"email":"a@b.com","password":"x"}"#))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body: "));
}

#[tokio::test]
async fn oversized_body_keeps_413() {
    let app = create_router(lazy_state());
    let huge = format!(r#"{{"email":"a@b.com","password":"{}"}}"#, "x".repeat(3 * 1024 * 1024));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(huge))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].as_str().unwrap().starts_with("Corpo da requisição inválido"));
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = create_router(lazy_state());

    let (status, body) = send(app, get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/complaints/{id}"].is_object());
    assert!(body["paths"]["/api/users/{id}/role"].is_object());
    assert!(body["components"]["securitySchemes"]["api_jwt"].is_object());
}

// --- Com banco ---

async fn login(app: &Router, email: &str) -> Value {
    let body = json!({ "email": email, "password": "segredo123" });
    let (status, body) = send(app.clone(), json_request(Method::POST, "/api/login", &body)).await;
    assert_eq!(status, StatusCode::OK, "login de {} falhou: {}", email, body);
    body
}

async fn complaint_ids(app: &Router, user_id: i64) -> Vec<i64> {
    let (status, body) = send(app.clone(), get(&format!("/api/complaints?user_id={}", user_id))).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn resident_registers_logs_in_and_files_a_complaint(pool: sqlx::PgPool) {
    let app = create_router(state_from_pool(pool));

    let body = registration("Ana", "Ana@Exemplo.com", 5, 10);
    let (status, body) = send(app.clone(), json_request(Method::POST, "/api/register", &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_number());

    let duplicate = registration("Ana", "ana@exemplo.com", 6, 11);
    let (status, _) = send(app.clone(), json_request(Method::POST, "/api/register", &duplicate)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let profile = login(&app, "ana@exemplo.com").await;
    assert_eq!(profile["role"], "morador");
    assert_eq!(profile["is_admin"], false);
    assert_eq!(profile["block"], 5);
    assert_eq!(profile["apartment"], 10);
    let user_id = profile["id"].as_i64().unwrap();

    let complaint = json!({ "user_id": user_id, "subject": "Barulho", "description": "Som alto após as 22h" });
    let (status, _) = send(app.clone(), json_request(Method::POST, "/api/complaints", &complaint)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app.clone(), get(&format!("/api/complaints?user_id={}", user_id))).await;
    assert_eq!(status, StatusCode::OK);
    let complaints = body.as_array().unwrap();
    assert_eq!(complaints.len(), 1);
    assert_eq!(complaints[0]["status"], "aberto");
    assert_eq!(complaints[0]["user_block"], 5);
    assert!(complaints[0]["admin_comment"].is_null());
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn wrong_password_is_unauthorized(pool: sqlx::PgPool) {
    let state = state_from_pool(pool);
    seed_user(&state, "ana@exemplo.com", 5, 10, crate::models::auth::Role::Morador).await;
    let app = create_router(state);

    let body = json!({ "email": "ana@exemplo.com", "password": "errada" });
    let (status, body) = send(app, json_request(Method::POST, "/api/login", &body)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "E-mail ou senha inválidos.");
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn block_admin_closes_complaint_from_own_block(pool: sqlx::PgPool) {
    use crate::models::auth::Role;

    let state = state_from_pool(pool);
    let resident = seed_user(&state, "morador@exemplo.com", 5, 10, Role::Morador).await;
    let admin = seed_user(&state, "admin5@exemplo.com", 5, 1, Role::AdminBloco).await;
    let outsider = seed_user(&state, "admin6@exemplo.com", 6, 1, Role::AdminBloco).await;
    let complaint_id = state
        .complaint_service
        .create_complaint(&resident, "Vazamento", "Água na garagem")
        .await
        .unwrap();
    let app = create_router(state);

    let update = json!({ "status": "fechado", "admin_comment": "Resolvido" });
    let uri = |caller: i32| format!("/api/complaints/{}?user_id={}", complaint_id, caller);

    let (status, _) = send(app.clone(), json_request(Method::PUT, &uri(outsider.id), &update)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app.clone(), json_request(Method::PUT, &uri(resident.id), &update)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app.clone(), json_request(Method::PUT, &uri(admin.id), &update)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app.clone(), get(&format!("/api/complaints?user_id={}", resident.id))).await;
    assert_eq!(body[0]["status"], "fechado");
    assert_eq!(body[0]["admin_comment"], "Resolvido");

    // Admin de outro bloco nem enxerga a reclamação
    assert!(complaint_ids(&app, outsider.id as i64).await.is_empty());
    assert_eq!(complaint_ids(&app, admin.id as i64).await, vec![complaint_id as i64]);
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn updating_missing_complaint_is_not_found(pool: sqlx::PgPool) {
    use crate::models::auth::Role;

    let state = state_from_pool(pool);
    let sindico = seed_user(&state, "sindico@exemplo.com", 1, 1, Role::Sindico).await;
    let resident = seed_user(&state, "morador@exemplo.com", 5, 10, Role::Morador).await;
    let app = create_router(state);

    let update = json!({ "status": "em análise" });
    for caller in [sindico.id, resident.id] {
        let uri = format!("/api/complaints/999999?user_id={}", caller);
        let (status, body) = send(app.clone(), json_request(Method::PUT, &uri, &update)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Reclamação não encontrada.");
    }
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn sindico_promotes_resident_and_sees_it_in_block_listing(pool: sqlx::PgPool) {
    use crate::models::auth::Role;

    let state = state_from_pool(pool);
    let sindico = seed_user(&state, "sindico@exemplo.com", 1, 1, Role::Sindico).await;
    let resident = seed_user(&state, "morador@exemplo.com", 5, 10, Role::Morador).await;
    let app = create_router(state);

    let uri = format!("/api/users/{}/role?user_id={}", resident.id, sindico.id);
    let (status, body) = send(
        app.clone(),
        json_request(Method::PUT, &uri, &json!({ "new_role": "admin_bloco" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Role do usuário {} atualizada para admin_bloco.", resident.id)
    );

    let uri = format!("/api/users?user_id={}&bloco_id_filter={}", sindico.id, resident.block_id);
    let (status, body) = send(app.clone(), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["role"], "admin_bloco");
    assert_eq!(users[0]["is_admin"], true);

    // Promover a síndico não é permitido
    let uri = format!("/api/users/{}/role?user_id={}", resident.id, sindico.id);
    let (status, _) = send(app, json_request(Method::PUT, &uri, &json!({ "new_role": "sindico" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn non_sindico_cannot_manage_users(pool: sqlx::PgPool) {
    use crate::models::auth::Role;

    let state = state_from_pool(pool);
    let resident = seed_user(&state, "morador@exemplo.com", 5, 10, Role::Morador).await;
    let admin = seed_user(&state, "admin5@exemplo.com", 5, 1, Role::AdminBloco).await;
    let neighbour = seed_user(&state, "vizinho@exemplo.com", 6, 2, Role::Morador).await;
    let app = create_router(state);

    let (status, _) = send(app.clone(), get(&format!("/api/users?user_id={}", resident.id))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin de bloco só lista o próprio bloco, mesmo pedindo outro
    let uri = format!("/api/users?user_id={}&bloco_id_filter={}", admin.id, neighbour.block_id);
    let (status, body) = send(app.clone(), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().iter().all(|u| u["block"] == 5));

    let uri = format!("/api/users/{}/role?user_id={}", neighbour.id, admin.id);
    let (status, _) = send(
        app.clone(),
        json_request(Method::PUT, &uri, &json!({ "new_role": "admin_bloco" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/users/{}?user_id={}", neighbour.id, admin.id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn role_changes_reject_self_sindico_and_missing_targets(pool: sqlx::PgPool) {
    use crate::models::auth::Role;

    let state = state_from_pool(pool);
    let sindico = seed_user(&state, "sindico@exemplo.com", 1, 1, Role::Sindico).await;
    let other_sindico = seed_user(&state, "sindico2@exemplo.com", 2, 1, Role::Sindico).await;
    let app = create_router(state);

    let change = |target: i32| {
        json_request(
            Method::PUT,
            &format!("/api/users/{}/role?user_id={}", target, sindico.id),
            &json!({ "new_role": "admin_bloco" }),
        )
    };

    let (status, body) = send(app.clone(), change(sindico.id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "O síndico não pode alterar a própria role.");

    let (status, body) = send(app.clone(), change(other_sindico.id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Não é possível alterar a role de um síndico.");

    let (status, body) = send(app.clone(), change(999_999)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Usuário não encontrado.");

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/users/{}?user_id={}", other_sindico.id, sindico.id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Não é permitido excluir um Super Admin.");
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn only_sindico_lists_blocks(pool: sqlx::PgPool) {
    use crate::models::auth::Role;

    let state = state_from_pool(pool);
    let sindico = seed_user(&state, "sindico@exemplo.com", 1, 1, Role::Sindico).await;
    let admin = seed_user(&state, "admin5@exemplo.com", 5, 1, Role::AdminBloco).await;
    let resident = seed_user(&state, "morador@exemplo.com", 5, 10, Role::Morador).await;
    let app = create_router(state);

    let (status, body) = send(app.clone(), get(&format!("/api/blocks?user_id={}", sindico.id))).await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, (0..=40).collect::<Vec<i64>>());

    for caller in [admin.id, resident.id] {
        let (status, body) = send(app.clone(), get(&format!("/api/blocks?user_id={}", caller))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Acesso negado. Apenas o síndico pode listar os blocos.");
    }
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn sindico_with_empty_block_filter_lists_everyone(pool: sqlx::PgPool) {
    use crate::models::auth::Role;

    let state = state_from_pool(pool);
    let sindico = seed_user(&state, "sindico@exemplo.com", 1, 1, Role::Sindico).await;
    seed_user(&state, "morador5@exemplo.com", 5, 10, Role::Morador).await;
    seed_user(&state, "morador6@exemplo.com", 6, 11, Role::Morador).await;
    let app = create_router(state);

    let uri = format!("/api/users?user_id={}&bloco_id_filter=", sindico.id);
    let (status, body) = send(app, get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    let blocks: Vec<i64> = body.as_array().unwrap().iter().map(|u| u["block"].as_i64().unwrap()).collect();
    assert_eq!(blocks, vec![1, 5, 6]);
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn deleting_user_removes_their_complaints(pool: sqlx::PgPool) {
    use crate::models::auth::Role;

    let state = state_from_pool(pool);
    let sindico = seed_user(&state, "sindico@exemplo.com", 1, 1, Role::Sindico).await;
    let resident = seed_user(&state, "morador@exemplo.com", 5, 10, Role::Morador).await;
    state
        .complaint_service
        .create_complaint(&resident, "Barulho", "Som alto")
        .await
        .unwrap();
    let app = create_router(state);

    assert_eq!(complaint_ids(&app, sindico.id as i64).await.len(), 1);

    let delete = |target: i32| {
        Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/users/{}?user_id={}", target, sindico.id))
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(app.clone(), delete(resident.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(complaint_ids(&app, sindico.id as i64).await.is_empty());

    let (status, _) = send(app.clone(), delete(resident.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app, delete(sindico.id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn login_token_identifies_the_requester(pool: sqlx::PgPool) {
    use crate::models::auth::Role;

    let state = state_from_pool(pool);
    seed_user(&state, "admin5@exemplo.com", 5, 1, Role::AdminBloco).await;
    let app = create_router(state);

    let profile = login(&app, "admin5@exemplo.com").await;
    let token = profile["token"].as_str().unwrap();

    let (status, body) = send(app, with_bearer(get("/api/me"), token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin_bloco");
    let views: Vec<&str> = body["views"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
    assert!(views.contains(&"manage_complaints"));
    assert!(views.contains(&"manage_users"));
    assert!(!views.contains(&"block_filter"));
}
