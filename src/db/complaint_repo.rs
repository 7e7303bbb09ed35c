// src/db/complaint_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::complaint::{Complaint, ComplaintOwnership, ComplaintStatus},
    services::access::Visibility,
};

// `$1` restringe ao dono, `$2` ao bloco do dono; nulos não filtram
const LIST_COMPLAINTS: &str = r#"
    SELECT
        c.id, c.user_id, c.subject, c.description, c.status, c.admin_comment,
        c.created_at, c.updated_at,
        u.name AS user_name, u.email AS user_email,
        b.number AS user_block, u.apartment AS user_apartment
    FROM complaints c
    JOIN users u ON u.id = c.user_id
    JOIN blocks b ON b.id = u.block_id
    WHERE ($1::INTEGER IS NULL OR c.user_id = $1)
      AND ($2::INTEGER IS NULL OR u.block_id = $2)
    ORDER BY c.created_at DESC, c.id DESC
"#;

#[derive(Clone)]
pub struct ComplaintRepository {
    pool: PgPool,
}

impl ComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i32, subject: &str, description: &str) -> Result<i32, AppError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO complaints (user_id, subject, description, status)
            VALUES ($1, $2, $3, 'aberto')
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(subject)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Reclamações visíveis, das mais recentes para as mais antigas.
    pub async fn list(&self, visibility: Visibility) -> Result<Vec<Complaint>, AppError> {
        let (owner, block) = match visibility {
            Visibility::Own(user_id) => (Some(user_id), None),
            Visibility::Block(block_id) => (None, Some(block_id)),
            Visibility::All => (None, None),
        };

        let complaints = sqlx::query_as::<_, Complaint>(LIST_COMPLAINTS)
            .bind(owner)
            .bind(block)
            .fetch_all(&self.pool)
            .await?;
        Ok(complaints)
    }

    pub async fn find_ownership(&self, id: i32) -> Result<Option<ComplaintOwnership>, AppError> {
        let ownership = sqlx::query_as::<_, ComplaintOwnership>(
            r#"
            SELECT c.id, c.user_id, u.block_id
            FROM complaints c
            JOIN users u ON u.id = c.user_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ownership)
    }

    // Última escrita vence: não há controle de concorrência otimista.
    pub async fn update_status(
        &self,
        id: i32,
        status: ComplaintStatus,
        admin_comment: Option<&str>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE complaints
            SET status = $1, admin_comment = $2, updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(status)
        .bind(admin_comment)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_user<'e, E>(&self, executor: E, user_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM complaints WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
