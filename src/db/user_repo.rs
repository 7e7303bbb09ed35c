// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::auth::{Role, User, UserProfile},
};

// Todo usuário é lido junto com o número do seu bloco
macro_rules! select_user {
    () => {
        r#"
        SELECT
            u.id, u.name, u.email, u.password_hash, u.role,
            u.block_id, b.number AS block, u.apartment, u.created_at
        FROM users u
        JOIN blocks b ON b.id = u.block_id
        "#
    };
}

// Filtro opcional: `$1` nulo lista todos os blocos
const LIST_PROFILES: &str = r#"
    SELECT
        u.id, u.name, u.email, u.role, (u.role <> 'morador') AS is_admin,
        u.block_id, b.number AS block, u.apartment
    FROM users u
    JOIN blocks b ON b.id = u.block_id
    WHERE ($1::INTEGER IS NULL OR u.block_id = $1)
    ORDER BY b.number, u.apartment, u.id
"#;

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(concat!(select_user!(), " WHERE u.email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(concat!(select_user!(), " WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Cria um novo morador e devolve o id gerado.
    // E-mail duplicado vira `EmailAlreadyExists`.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
        block_id: i32,
        apartment: i32,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email, password_hash, block_id, apartment, role)
            VALUES ($1, $2, $3, $4, $5, 'morador')
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(block_id)
        .bind(apartment)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(id)
    }

    /// Lista perfis ordenados por bloco e apartamento, opcionalmente de um único bloco.
    pub async fn list_profiles(&self, block_id: Option<i32>) -> Result<Vec<UserProfile>, AppError> {
        let users = sqlx::query_as::<_, UserProfile>(LIST_PROFILES)
            .bind(block_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn update_role<'e, E>(&self, executor: E, id: i32, role: Role) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
            .bind(role)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_user<'e, E>(&self, executor: E, id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
