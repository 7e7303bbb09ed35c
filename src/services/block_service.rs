// src/services/block_service.rs

use crate::{
    common::error::AppError,
    db::BlockRepository,
    models::{auth::User, block::Block},
    services::access::{authorize, Action, Scope},
};

#[derive(Clone)]
pub struct BlockService {
    block_repo: BlockRepository,
}

impl BlockService {
    pub fn new(block_repo: BlockRepository) -> Self {
        Self { block_repo }
    }

    pub async fn list_blocks(&self, caller: &User) -> Result<Vec<Block>, AppError> {
        authorize(caller, Action::ListBlocks, Scope::Global)?;
        self.block_repo.list_all().await
    }
}
