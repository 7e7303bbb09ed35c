// src/services/user_service.rs

use sqlx::PgPool;

use crate::{
    common::error::{AppError, InvalidArgument},
    db::{ComplaintRepository, UserRepository},
    models::auth::{Role, User, UserProfile},
    services::{
        access::{authorize, user_listing_scope, Action, Scope},
        auth::normalize_email,
    },
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    complaint_repo: ComplaintRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl UserService {
    pub fn new(user_repo: UserRepository, complaint_repo: ComplaintRepository, pool: PgPool) -> Self {
        Self { user_repo, complaint_repo, pool }
    }

    pub async fn list_users(
        &self,
        caller: &User,
        block_filter: Option<i32>,
    ) -> Result<Vec<UserProfile>, AppError> {
        let block_id = user_listing_scope(caller, block_filter)?;
        self.user_repo.list_profiles(block_id).await
    }

    /// Promove/rebaixa entre morador e admin_bloco. Só o síndico pode.
    pub async fn change_role(&self, caller: &User, target_id: i32, new_role: Role) -> Result<(), AppError> {
        authorize(caller, Action::ChangeRole, Scope::Global)?;

        if new_role == Role::Sindico {
            return Err(AppError::InvalidArgument(InvalidArgument::RoleNotAssignable));
        }

        let target = self
            .user_repo
            .find_by_id(target_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if target.id == caller.id {
            return Err(AppError::InvalidArgument(InvalidArgument::SelfRoleChange));
        }
        if target.role == Role::Sindico {
            return Err(AppError::InvalidArgument(InvalidArgument::TargetIsSindico));
        }

        self.user_repo.update_role(&self.pool, target.id, new_role).await?;

        tracing::info!(
            "👑 Usuário {} alterou a role do usuário {}: {} -> {}.",
            caller.id,
            target.id,
            target.role,
            new_role
        );
        Ok(())
    }

    /// Exclui o usuário e, na mesma transação, todas as suas reclamações.
    pub async fn delete_user(&self, caller: &User, target_id: i32) -> Result<(), AppError> {
        authorize(caller, Action::DeleteUser, Scope::Global)?;

        let target = self
            .user_repo
            .find_by_id(target_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if target.id == caller.id {
            return Err(AppError::InvalidArgument(InvalidArgument::SelfDeletion));
        }
        if target.role == Role::Sindico {
            return Err(AppError::ProtectedAccount);
        }

        let mut tx = self.pool.begin().await?;

        let removed_complaints = self.complaint_repo.delete_by_user(&mut *tx, target.id).await?;
        let removed = self.user_repo.delete_user(&mut *tx, target.id).await?;
        if removed == 0 {
            // Outra requisição chegou antes; o drop do tx faz o rollback
            return Err(AppError::UserNotFound);
        }

        tx.commit().await?;

        tracing::info!(
            "🗑️ Usuário {} ({}) excluiu o usuário {} e {} reclamação(ões).",
            caller.id,
            caller.role,
            target.id,
            removed_complaints
        );
        Ok(())
    }

    /// Usado pela linha de comando (`set-role`): não há requisitante.
    pub async fn set_role_by_email(&self, email: &str, role: Role) -> Result<User, AppError> {
        let mut user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.user_repo.update_role(&self.pool, user.id, role).await?;
        tracing::info!("Usuário {} ({}) agora é {}.", user.id, user.email, role);

        user.role = role;
        Ok(user)
    }
}
