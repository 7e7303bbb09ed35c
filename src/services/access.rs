// src/services/access.rs
//
// Política de acesso: toda decisão de permissão passa por `authorize`.
// O papel do requisitante vem sempre do banco, nunca do cliente.

use crate::{
    common::error::{AppError, AppResult},
    models::{auth::{Role, User}, navigation::View},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewComplaints,
    ManageComplaint,
    ListUsers,
    ChangeRole,
    DeleteUser,
    ListBlocks,
}

/// Alcance do recurso sobre o qual a ação é feita.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Block(i32),
}

/// Quais reclamações o requisitante enxerga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Own(i32),
    Block(i32),
    All,
}

// Papel mínimo exigido por cada ação
fn required_role(action: Action) -> Role {
    match action {
        Action::ViewComplaints => Role::Morador,
        Action::ManageComplaint | Action::ListUsers => Role::AdminBloco,
        Action::ChangeRole | Action::DeleteUser | Action::ListBlocks => Role::Sindico,
    }
}

pub fn authorize(caller: &User, action: Action, scope: Scope) -> AppResult<()> {
    if caller.role < required_role(action) {
        return Err(AppError::Forbidden(action));
    }

    // admin_bloco só age dentro do próprio bloco
    match (caller.role, scope) {
        (Role::Sindico, _) | (Role::Morador, _) => Ok(()),
        (Role::AdminBloco, Scope::Block(block_id)) if block_id == caller.block_id => Ok(()),
        (Role::AdminBloco, _) => Err(AppError::OutOfScope(action)),
    }
}

pub fn complaint_visibility(caller: &User) -> Visibility {
    match caller.role {
        Role::Morador => Visibility::Own(caller.id),
        Role::AdminBloco => Visibility::Block(caller.block_id),
        Role::Sindico => Visibility::All,
    }
}

/// Resolve o filtro de bloco da listagem de usuários (`None` = todos os blocos).
/// O filtro pedido por um admin_bloco é ignorado: ele sempre vê o próprio bloco.
pub fn user_listing_scope(caller: &User, requested_block: Option<i32>) -> AppResult<Option<i32>> {
    let block_id = match caller.role {
        Role::Sindico => requested_block,
        _ => Some(caller.block_id),
    };
    let scope = block_id.map_or(Scope::Global, Scope::Block);

    authorize(caller, Action::ListUsers, scope)?;
    Ok(block_id)
}

pub fn available_views(caller: &User) -> Vec<View> {
    let own_block = Scope::Block(caller.block_id);
    let mut views = vec![View::Complaints, View::NewComplaint];

    if authorize(caller, Action::ManageComplaint, own_block).is_ok() {
        views.push(View::ManageComplaints);
    }
    if authorize(caller, Action::ListUsers, own_block).is_ok() {
        views.push(View::ManageUsers);
    }
    if authorize(caller, Action::ListBlocks, Scope::Global).is_ok() {
        views.push(View::BlockFilter);
    }
    views
}
