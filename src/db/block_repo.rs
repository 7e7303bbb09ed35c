// src/db/block_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::block::Block};

#[derive(Clone)]
pub struct BlockRepository {
    pool: PgPool,
}

impl BlockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Block>, AppError> {
        let blocks = sqlx::query_as::<_, Block>("SELECT id, number FROM blocks ORDER BY number")
            .fetch_all(&self.pool)
            .await?;
        Ok(blocks)
    }

    pub async fn find_by_number(&self, number: i32) -> Result<Option<Block>, AppError> {
        let block = sqlx::query_as::<_, Block>("SELECT id, number FROM blocks WHERE number = $1")
            .bind(number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(block)
    }
}
