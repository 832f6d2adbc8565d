use crate::error::ApiError;
use crate::models::CurrentUser;
use crate::repositories::UserRepository;
use std::sync::Arc;

/// The only message a failed login ever produces.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self { user_repo }
    }

    /// Plain equality lookup on username and password. Exactly one matching
    /// row logs the user in; no match, several matches and backend failures
    /// all collapse into the same authentication error.
    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentUser, ApiError> {
        let mut users = match self.user_repo.find_by_credentials(username, password).await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!(error = %e, "login lookup failed");
                return Err(ApiError::authentication(INVALID_CREDENTIALS));
            }
        };

        match users.len() {
            1 => {
                let user = users.remove(0);
                tracing::info!(user_id = %user.id, "user logged in");
                Ok(user.into())
            }
            0 => {
                tracing::debug!(username = %username, "no user matched credentials");
                Err(ApiError::authentication(INVALID_CREDENTIALS))
            }
            _ => {
                tracing::warn!(username = %username, "credentials matched more than one user");
                Err(ApiError::authentication(INVALID_CREDENTIALS))
            }
        }
    }
}
