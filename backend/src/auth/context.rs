/// Who passed the admin guard. Inserted as a request extension by
/// `admin_middleware`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminContext {
    /// Request carried one of the configured admin keys.
    ApiKey,
    /// No admin keys are configured, so the routes are open.
    Development,
}

impl AdminContext {
    pub fn is_api_key(&self) -> bool {
        matches!(self, AdminContext::ApiKey)
    }
}
