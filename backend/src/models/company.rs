use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub image: String,
    pub working_hours: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub description: String,
    pub location: String,
    pub image: String,
    pub working_hours: String,
}

/// Link between a user and a company they may apply to. Duplicate pairs are
/// not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub user_id: uuid::Uuid,
    pub company_id: i64,
}
