pub mod admin_service;
pub mod assignment_service;
pub mod auth_service;
pub mod seed_service;

// Re-export commonly used types
pub use admin_service::AdminService;
pub use assignment_service::{AssignmentService, OpportunityList, NO_COMPANIES_MESSAGE};
pub use auth_service::{AuthService, INVALID_CREDENTIALS};
pub use seed_service::{seed_companies, SeedReport, SeedService};
