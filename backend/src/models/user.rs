use chrono::{DateTime, Utc};
use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Company;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    // Stored and compared as plain text
    #[serde(skip)]
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

impl NewUser {
    /// Required-field check; no uniqueness or format rules beyond presence.
    pub fn validate(&self) -> Result<(), ApiError> {
        for (field, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("email", &self.email),
            ("full_name", &self.full_name),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::validation(format!("{} is required", field)));
            }
        }
        Ok(())
    }
}

/// The authenticated session subject as carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWithCompanies {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub companies: Vec<Company>,
}

/// One row of the users ⟕ user_companies ⟕ companies expansion. Company
/// columns are null for users without assignments.
#[derive(Debug, Clone, FromRow)]
pub struct UserCompanyRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_location: Option<String>,
    pub company_image: Option<String>,
    pub company_working_hours: Option<String>,
}

impl UserCompanyRow {
    fn company(&self) -> Option<Company> {
        let id = self.company_id?;
        Some(Company {
            id,
            name: self.company_name.clone().unwrap_or_default(),
            description: self.company_description.clone().unwrap_or_default(),
            location: self.company_location.clone().unwrap_or_default(),
            image: self.company_image.clone().unwrap_or_default(),
            working_hours: self.company_working_hours.clone().unwrap_or_default(),
        })
    }
}

/// Flatten the expanded rows into one entry per user, keeping the order in
/// which users first appear.
pub fn group_user_rows(rows: Vec<UserCompanyRow>) -> Vec<UserWithCompanies> {
    let mut users: Vec<UserWithCompanies> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let company = row.company();
        match index.get(&row.user_id) {
            Some(&idx) => users[idx].companies.extend(company),
            None => {
                index.insert(row.user_id, users.len());
                users.push(UserWithCompanies {
                    id: row.user_id,
                    username: row.username,
                    email: row.email,
                    full_name: row.full_name,
                    created_at: row.created_at,
                    companies: company.into_iter().collect(),
                });
            }
        }
    }

    users
}
