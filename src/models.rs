pub mod auth;
pub mod block;
pub mod complaint;
pub mod message;
pub mod navigation;
