pub mod access;
pub mod auth;
pub mod block_service;
pub mod complaint_service;
pub mod user_service;
