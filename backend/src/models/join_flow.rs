use serde::{Deserialize, Serialize};

/// Step of the join wizard for the current session.
///
/// The only way to reach [`JoinFlow::Redirecting`] is
/// `join` → `apply_now` → `complete`, in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JoinFlow {
    #[default]
    Idle,
    JoinPrompt {
        company: String,
    },
    WorkPermitForm {
        company: String,
    },
    Redirecting {
        company: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("cannot {action} while in {from} state")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
    #[error("company name is required")]
    MissingCompany,
}

impl JoinFlow {
    pub fn name(&self) -> &'static str {
        match self {
            JoinFlow::Idle => "Idle",
            JoinFlow::JoinPrompt { .. } => "JoinPrompt",
            JoinFlow::WorkPermitForm { .. } => "WorkPermitForm",
            JoinFlow::Redirecting { .. } => "Redirecting",
        }
    }

    pub fn company(&self) -> Option<&str> {
        match self {
            JoinFlow::Idle => None,
            JoinFlow::JoinPrompt { company }
            | JoinFlow::WorkPermitForm { company }
            | JoinFlow::Redirecting { company } => Some(company),
        }
    }

    /// "Join" on a company card. Picking another card while the prompt is
    /// open replaces the selection.
    pub fn join(&self, company: &str) -> Result<JoinFlow, FlowError> {
        let company = company.trim();
        if company.is_empty() {
            return Err(FlowError::MissingCompany);
        }

        match self {
            JoinFlow::Idle | JoinFlow::JoinPrompt { .. } => Ok(JoinFlow::JoinPrompt {
                company: company.to_string(),
            }),
            other => Err(other.invalid("join")),
        }
    }

    /// "Apply Now" in the join prompt.
    pub fn apply_now(&self) -> Result<JoinFlow, FlowError> {
        match self {
            JoinFlow::JoinPrompt { company } => Ok(JoinFlow::WorkPermitForm {
                company: company.clone(),
            }),
            other => Err(other.invalid("apply")),
        }
    }

    /// "Complete" on the work permit form.
    pub fn complete(&self) -> Result<JoinFlow, FlowError> {
        match self {
            JoinFlow::WorkPermitForm { company } => Ok(JoinFlow::Redirecting {
                company: company.clone(),
            }),
            other => Err(other.invalid("complete")),
        }
    }

    /// Closing any modal drops back to the company list.
    pub fn close(&self) -> JoinFlow {
        JoinFlow::Idle
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            from: self.name(),
            action,
        }
    }
}
