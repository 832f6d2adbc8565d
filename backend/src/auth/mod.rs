pub mod context;
pub mod session;

pub use context::AdminContext;
pub use session::{SessionContext, SESSION_COOKIE};
