// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{BlockRepository, UserRepository},
    models::auth::{Claims, User},
};

/// Parâmetros de segurança vindos da configuração.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    block_repo: BlockRepository,
    pool: PgPool,
    settings: AuthSettings,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        block_repo: BlockRepository,
        pool: PgPool,
        settings: AuthSettings,
    ) -> Self {
        Self { user_repo, block_repo, pool, settings }
    }

    /// Registra um morador e devolve o id criado.
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        block_number: i32,
        apartment: i32,
    ) -> Result<i32, AppError> {
        let block = self
            .block_repo
            .find_by_number(block_number)
            .await?
            .ok_or(AppError::BlockNotFound(block_number))?;

        // bcrypt é caro: roda fora das threads do runtime
        let password_clone = password.to_owned();
        let cost = self.settings.bcrypt_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let id = self
            .user_repo
            .create_user(
                &self.pool,
                name.trim(),
                &normalize_email(email),
                &hashed_password,
                block.id,
                apartment,
            )
            .await?;

        tracing::info!("🏠 Morador {} registrado no bloco {} (apto {}).", id, block.number, apartment);
        Ok(id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::debug!("Senha incorreta para o usuário {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id)?;
        Ok((user, token))
    }

    /// Carrega o usuário requisitante; o papel sempre vem do banco.
    pub async fn resolve_caller(&self, user_id: i32) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UnknownRequester(user_id))
    }

    pub fn create_token(&self, user_id: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.settings.token_ttl)
            .ok_or_else(|| anyhow::anyhow!("Validade do token fora do intervalo de datas"))?;

        // `exp` anterior a 1970 não cabe em `usize`
        let to_claim = |instant: chrono::DateTime<Utc>| {
            usize::try_from(instant.timestamp())
                .map_err(|_| anyhow::anyhow!("Instante inválido para o token: {}", instant))
        };

        let claims = Claims {
            sub: user_id,
            exp: to_claim(expires_at)?,
            iat: to_claim(now)?,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.jwt_secret.as_ref()),
        )?)
    }

    /// Valida assinatura e expiração, devolvendo o id do usuário (`sub`).
    pub fn decode_token(&self, token: &str) -> Result<i32, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("Token rejeitado: {}", e);
            AppError::InvalidToken
        })?;

        Ok(token_data.claims.sub)
    }
}
