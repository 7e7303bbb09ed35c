// src/services/complaint_service.rs

use crate::{
    common::error::AppError,
    db::ComplaintRepository,
    models::{
        auth::User,
        complaint::{Complaint, ComplaintStatus},
    },
    services::access::{authorize, complaint_visibility, Action, Scope},
};

#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
}

impl ComplaintService {
    pub fn new(complaint_repo: ComplaintRepository) -> Self {
        Self { complaint_repo }
    }

    pub async fn create_complaint(
        &self,
        owner: &User,
        subject: &str,
        description: &str,
    ) -> Result<i32, AppError> {
        let id = self
            .complaint_repo
            .create(owner.id, subject.trim(), description.trim())
            .await?;

        tracing::info!("📝 Reclamação {} aberta pelo usuário {}.", id, owner.id);
        Ok(id)
    }

    /// Moradores veem só as próprias; admins veem tudo o que está no seu escopo.
    pub async fn list_complaints(&self, caller: &User) -> Result<Vec<Complaint>, AppError> {
        authorize(caller, Action::ViewComplaints, Scope::Block(caller.block_id))?;
        self.complaint_repo.list(complaint_visibility(caller)).await
    }

    pub async fn update_complaint(
        &self,
        caller: &User,
        complaint_id: i32,
        status: ComplaintStatus,
        admin_comment: Option<&str>,
    ) -> Result<(), AppError> {
        // Existência primeiro: um id inexistente é sempre 404, para qualquer papel
        let ownership = self
            .complaint_repo
            .find_ownership(complaint_id)
            .await?
            .ok_or(AppError::ComplaintNotFound)?;

        authorize(caller, Action::ManageComplaint, Scope::Block(ownership.block_id))?;

        let comment = admin_comment.map(str::trim).filter(|c| !c.is_empty());
        let updated = self
            .complaint_repo
            .update_status(ownership.id, status, comment)
            .await?;

        // Pode ter sido removida (junto com o dono) entre a busca e o UPDATE
        if updated == 0 {
            return Err(AppError::ComplaintNotFound);
        }

        tracing::info!(
            "🛠️ Reclamação {} (do usuário {}) atualizada para {:?} por {}.",
            ownership.id,
            ownership.user_id,
            status,
            caller.id
        );
        Ok(())
    }
}
