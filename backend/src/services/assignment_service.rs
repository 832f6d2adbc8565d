use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Company;
use crate::repositories::{AssignmentRepository, CompanyRepository};

pub const NO_COMPANIES_MESSAGE: &str = "You don't have any companies assigned to you yet.";

/// Companies a user may join. An empty result is always the explicit
/// `Empty` variant, never `Available` with no companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OpportunityList {
    Empty { message: String },
    Available { companies: Vec<Company> },
}

impl OpportunityList {
    pub fn from_companies(companies: Vec<Company>) -> Self {
        if companies.is_empty() {
            OpportunityList::Empty {
                message: NO_COMPANIES_MESSAGE.to_string(),
            }
        } else {
            OpportunityList::Available { companies }
        }
    }

    pub fn companies(&self) -> &[Company] {
        match self {
            OpportunityList::Empty { .. } => &[],
            OpportunityList::Available { companies } => companies,
        }
    }
}

pub struct AssignmentService {
    assignment_repo: Arc<dyn AssignmentRepository + Send + Sync>,
    company_repo: Arc<dyn CompanyRepository + Send + Sync>,
}

impl AssignmentService {
    pub fn new(
        assignment_repo: Arc<dyn AssignmentRepository + Send + Sync>,
        company_repo: Arc<dyn CompanyRepository + Send + Sync>,
    ) -> Self {
        Self {
            assignment_repo,
            company_repo,
        }
    }

    /// Two sequential round trips: the user's assignment rows, then the
    /// companies they point at. Company order is whatever the backend returns.
    pub async fn opportunities_for(&self, user_id: Uuid) -> Result<OpportunityList, ApiError> {
        let company_ids = self.assignment_repo.company_ids_for_user(user_id).await?;

        if company_ids.is_empty() {
            tracing::debug!(user_id = %user_id, "user has no company assignments");
            return Ok(OpportunityList::from_companies(Vec::new()));
        }

        let companies = self.company_repo.list_by_ids(&company_ids).await?;
        tracing::debug!(
            user_id = %user_id,
            assignments = company_ids.len(),
            companies = companies.len(),
            "resolved company assignments"
        );

        Ok(OpportunityList::from_companies(companies))
    }
}
