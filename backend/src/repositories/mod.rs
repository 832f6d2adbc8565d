pub mod assignment_repo;
pub mod company_repo;
pub mod memory;
pub mod user_repo;

pub use assignment_repo::AssignmentRepository;
pub use company_repo::CompanyRepository;
pub use memory::MemoryStore;
pub use user_repo::UserRepository;
