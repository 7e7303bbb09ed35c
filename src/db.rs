pub mod user_repo;
pub use user_repo::UserRepository;
pub mod complaint_repo;
pub use complaint_repo::ComplaintRepository;
pub mod block_repo;
pub use block_repo::BlockRepository;
