use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AssignmentRepository, CompanyRepository, UserRepository};
use crate::{
    error::ApiError,
    models::{Assignment, Company, NewCompany, NewUser, User, UserCompanyRow},
};

/// Tables that have not been created yet are `None`, so table checks fail the same
/// way they do against an uninitialized database.
#[derive(Debug, Default)]
struct Tables {
    companies: Option<Vec<Company>>,
    users: Option<Vec<User>>,
    user_companies: Option<Vec<Assignment>>,
    next_company_id: i64,
}

/// In-process backend implementing every repository trait. Selected with
/// `STORAGE_BACKEND=memory` for local runs without PostgreSQL, and used by
/// the test suites, which can switch on individual failures to observe
/// partial writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unreachable: AtomicBool,
    fail_assignment_inserts: AtomicBool,
    fail_user_deletes: AtomicBool,
}

fn missing(table: &str) -> ApiError {
    ApiError::backend(format!("relation \"{}\" does not exist", table))
}

fn table<'a, T>(rows: &'a Option<Vec<T>>, name: &str) -> Result<&'a Vec<T>, ApiError> {
    rows.as_ref().ok_or_else(|| missing(name))
}

fn table_mut<'a, T>(rows: &'a mut Option<Vec<T>>, name: &str) -> Result<&'a mut Vec<T>, ApiError> {
    rows.as_mut().ok_or_else(|| missing(name))
}

impl MemoryStore {
    /// An empty backend with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails while set, as if the backend could not be reached.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn fail_assignment_inserts(&self, fail: bool) {
        self.fail_assignment_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_user_deletes(&self, fail: bool) {
        self.fail_user_deletes.store(fail, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), ApiError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ApiError::backend("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn check_table(&self) -> Result<(), ApiError> {
        self.check_reachable()?;
        table(&self.tables.read().await.companies, "companies").map(|_| ())
    }

    async fn create_table(&self) -> Result<(), ApiError> {
        self.check_reachable()?;
        let mut tables = self.tables.write().await;
        if tables.companies.is_none() {
            tables.companies = Some(Vec::new());
            tables.next_company_id = 1;
        }
        Ok(())
    }

    async fn insert_many(&self, companies: &[NewCompany]) -> Result<u64, ApiError> {
        self.check_reachable()?;
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let rows = table_mut(&mut tables.companies, "companies")?;

        for company in companies {
            rows.push(Company {
                id: tables.next_company_id,
                name: company.name.clone(),
                description: company.description.clone(),
                location: company.location.clone(),
                image: company.image.clone(),
                working_hours: company.working_hours.clone(),
            });
            tables.next_company_id += 1;
        }

        Ok(companies.len() as u64)
    }

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Company>, ApiError> {
        self.check_reachable()?;
        let tables = self.tables.read().await;
        Ok(table(&tables.companies, "companies")?
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn list_ordered_by_name(&self) -> Result<Vec<Company>, ApiError> {
        self.check_reachable()?;
        let tables = self.tables.read().await;
        let mut rows = table(&tables.companies, "companies")?.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn check_table(&self) -> Result<(), ApiError> {
        self.check_reachable()?;
        table(&self.tables.read().await.users, "users").map(|_| ())
    }

    async fn create_table(&self) -> Result<(), ApiError> {
        self.check_reachable()?;
        let mut tables = self.tables.write().await;
        tables.users.get_or_insert_with(Vec::new);
        tables.user_companies.get_or_insert_with(Vec::new);
        Ok(())
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<User>, ApiError> {
        self.check_reachable()?;
        let tables = self.tables.read().await;
        Ok(table(&tables.users, "users")?
            .iter()
            .filter(|u| u.username == username && u.password == password)
            .take(2)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        self.check_reachable()?;
        let tables = self.tables.read().await;
        Ok(table(&tables.users, "users")?
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        self.check_reachable()?;
        let mut tables = self.tables.write().await;
        let row = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            password: user.password.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            created_at: Utc::now(),
        };
        table_mut(&mut tables.users, "users")?.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ApiError> {
        self.check_reachable()?;
        if self.fail_user_deletes.load(Ordering::SeqCst) {
            return Err(ApiError::backend("user delete rejected"));
        }

        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let referenced = table(&tables.user_companies, "user_companies")?
            .iter()
            .any(|a| a.user_id == id);
        if referenced {
            return Err(ApiError::backend(
                "update or delete on table \"users\" violates foreign key constraint",
            ));
        }

        let users = table_mut(&mut tables.users, "users")?;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }

    async fn list_with_companies(&self) -> Result<Vec<UserCompanyRow>, ApiError> {
        self.check_reachable()?;
        let tables = self.tables.read().await;
        let users = table(&tables.users, "users")?;
        let links = table(&tables.user_companies, "user_companies")?;
        let companies = table(&tables.companies, "companies")?;

        let mut rows = Vec::new();
        for user in users {
            let base = |company: Option<&Company>| UserCompanyRow {
                user_id: user.id,
                username: user.username.clone(),
                email: user.email.clone(),
                full_name: user.full_name.clone(),
                created_at: user.created_at,
                company_id: company.map(|c| c.id),
                company_name: company.map(|c| c.name.clone()),
                company_description: company.map(|c| c.description.clone()),
                company_location: company.map(|c| c.location.clone()),
                company_image: company.map(|c| c.image.clone()),
                company_working_hours: company.map(|c| c.working_hours.clone()),
            };

            let assigned: Vec<_> = links.iter().filter(|a| a.user_id == user.id).collect();
            if assigned.is_empty() {
                rows.push(base(None));
            }
            for link in assigned {
                rows.push(base(companies.iter().find(|c| c.id == link.company_id)));
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn company_ids_for_user(&self, user_id: Uuid) -> Result<Vec<i64>, ApiError> {
        self.check_reachable()?;
        let tables = self.tables.read().await;
        Ok(table(&tables.user_companies, "user_companies")?
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.company_id)
            .collect())
    }

    async fn insert_many(&self, user_id: Uuid, company_ids: &[i64]) -> Result<u64, ApiError> {
        self.check_reachable()?;
        if self.fail_assignment_inserts.load(Ordering::SeqCst) {
            return Err(ApiError::backend("assignment insert rejected"));
        }

        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let user_known = table(&tables.users, "users")?
            .iter()
            .any(|u| u.id == user_id);
        let companies = table(&tables.companies, "companies")?;
        let all_known = company_ids
            .iter()
            .all(|id| companies.iter().any(|c| c.id == *id));
        if !user_known || !all_known {
            return Err(ApiError::backend(
                "insert on table \"user_companies\" violates foreign key constraint",
            ));
        }

        let links = table_mut(&mut tables.user_companies, "user_companies")?;
        links.extend(company_ids.iter().map(|company_id| Assignment {
            user_id,
            company_id: *company_id,
        }));

        Ok(company_ids.len() as u64)
    }

    async fn insert(&self, user_id: Uuid, company_id: i64) -> Result<(), ApiError> {
        AssignmentRepository::insert_many(self, user_id, &[company_id])
            .await
            .map(|_| ())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, ApiError> {
        self.check_reachable()?;
        let mut tables = self.tables.write().await;
        let links = table_mut(&mut tables.user_companies, "user_companies")?;
        let before = links.len();
        links.retain(|a| a.user_id != user_id);
        Ok((before - links.len()) as u64)
    }
}
