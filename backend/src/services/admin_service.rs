use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{group_user_rows, Company, NewUser, UserWithCompanies};
use crate::repositories::{AssignmentRepository, CompanyRepository, UserRepository};

/// User and assignment management for the admin panel.
///
/// Multi-step writes are not rolled back. A failed assignment insert leaves
/// the new user without companies, and a failed user delete after the
/// assignments were removed leaves the user without companies.
pub struct AdminService {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    company_repo: Arc<dyn CompanyRepository + Send + Sync>,
    assignment_repo: Arc<dyn AssignmentRepository + Send + Sync>,
}

impl AdminService {
    pub fn new(
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        company_repo: Arc<dyn CompanyRepository + Send + Sync>,
        assignment_repo: Arc<dyn AssignmentRepository + Send + Sync>,
    ) -> Self {
        Self {
            user_repo,
            company_repo,
            assignment_repo,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserWithCompanies>, ApiError> {
        let rows = self.user_repo.list_with_companies().await?;
        Ok(group_user_rows(rows))
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, ApiError> {
        self.company_repo.list_ordered_by_name().await
    }

    pub async fn create_user(
        &self,
        new_user: NewUser,
        company_ids: &[i64],
    ) -> Result<UserWithCompanies, ApiError> {
        new_user.validate()?;

        let user = self.user_repo.create(&new_user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "created user");

        if !company_ids.is_empty() {
            if let Err(e) = self.assignment_repo.insert_many(user.id, company_ids).await {
                tracing::error!(
                    user_id = %user.id,
                    error = %e,
                    "user created but company assignment failed"
                );
                return Err(e);
            }
        }

        let companies = self.companies_for(user.id).await?;

        Ok(UserWithCompanies {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
            companies,
        })
    }

    /// Deletes the user's assignment rows first, then the user row.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ApiError> {
        let removed = self.assignment_repo.delete_for_user(user_id).await?;
        tracing::debug!(user_id = %user_id, removed, "removed company assignments");

        let deleted = match self.user_repo.delete(user_id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    error = %e,
                    "assignments removed but user delete failed"
                );
                return Err(e);
            }
        };

        if deleted == 0 {
            return Err(ApiError::not_found(format!("User {} not found", user_id)));
        }

        tracing::info!(user_id = %user_id, "deleted user");
        Ok(())
    }

    /// Adds a single assignment. Existing pairs are not checked, so the same
    /// company can be assigned twice.
    pub async fn assign_company(
        &self,
        user_id: Uuid,
        company_id: i64,
    ) -> Result<UserWithCompanies, ApiError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("User {} not found", user_id)))?;

        self.assignment_repo.insert(user_id, company_id).await?;

        let companies = self.companies_for(user_id).await?;

        Ok(UserWithCompanies {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
            companies,
        })
    }

    async fn companies_for(&self, user_id: Uuid) -> Result<Vec<Company>, ApiError> {
        let ids = self.assignment_repo.company_ids_for_user(user_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.company_repo.list_by_ids(&ids).await
    }
}
