pub mod company;
pub mod join_flow;
pub mod user;

// Re-export commonly used types
pub use company::*;
pub use join_flow::{FlowError, JoinFlow};
pub use user::*;
