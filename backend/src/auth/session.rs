use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::{CurrentUser, JoinFlow};

/// Name of the encrypted cookie that carries the session.
pub const SESSION_COOKIE: &str = "session";

/// Everything the server remembers about one browser session.
///
/// Lives only in the private cookie. It has no expiry and ends with the
/// browser session or an explicit logout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub current_user: Option<CurrentUser>,
    #[serde(default)]
    pub join_flow: JoinFlow,
}

impl SessionContext {
    pub fn logged_in(user: CurrentUser) -> Self {
        Self {
            current_user: Some(user),
            join_flow: JoinFlow::Idle,
        }
    }

    /// Reads the session from the jar. A missing cookie, or one that no
    /// longer decodes, is an anonymous session.
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Self::default();
        };

        match serde_json::from_str(cookie.value()) {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!(error = %e, "discarding unreadable session cookie");
                Self::default()
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// Name shown in the header bar.
    pub fn display_name(&self) -> &str {
        self.current_user
            .as_ref()
            .map(|u| u.full_name.as_str())
            .unwrap_or("Guest")
    }

    /// Writes the session back into the jar.
    pub fn store(&self, jar: PrivateCookieJar, secure: bool) -> Result<PrivateCookieJar, ApiError> {
        let value = serde_json::to_string(self)?;

        let cookie = Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .secure(secure)
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();

        Ok(jar.add(cookie))
    }

    /// Drops the session cookie and with it the user and any join flow.
    pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
    }
}
