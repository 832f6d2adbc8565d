use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::NewCompany;
use crate::repositories::{CompanyRepository, UserRepository};

/// Outcome of one initialization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub companies_created: bool,
    pub companies_inserted: u64,
    pub users_created: bool,
}

/// The three reference companies inserted when the companies table is first
/// created.
pub fn seed_companies() -> Vec<NewCompany> {
    vec![
        NewCompany {
            name: "Torkin Manes LLP".to_string(),
            image: "https://media.licdn.com/dms/image/v2/D5622AQHAkDlBaPaGOQ/feedshare-shrink_2048_1536/feedshare-shrink_2048_1536/0/1684941018254?e=2147483647&v=beta&t=9pA6_rS3hb_Ae2Rn655pO83DkPQF6AEBrob-bflFjCg".to_string(),
            description: "Torkin Manes LLP is a leading law firm where you will be hired to manage reception duties, greet clients, and maintain the organization of office spaces. In this role, you will be hired to answer the main switchboard and provide excellent customer service.".to_string(),
            location: "Toronto".to_string(),
            working_hours: "9:00 AM to 5:00 PM, Monday to Friday".to_string(),
        },
        NewCompany {
            name: "Medicentres Canada Inc".to_string(),
            image: "https://np.naukimg.com/cphoto/l4sFXqBsXnc4xYoO2O8LQoX5A4WlqVG8j6Hs5hczcqe+ZCY3HlMvVOHWwm4tWcieRn8/qiKUQ8l9WmuA8ozp9JKV4yBLXxcPmC3U9zBT7/jxvD6mcmnZYjVj7jMwDix5sF".to_string(),
            description: "Medicentres operates medical clinics across Canada, and you will be hired to greet patients, schedule appointments, and handle administrative tasks. In this position, you will be hired to interact with patients and ensure a smooth flow of operations within the clinic.".to_string(),
            location: "Ontario".to_string(),
            working_hours: "8:00 AM to 4:00 PM or 9:00 AM to 5:00 PM".to_string(),
        },
        NewCompany {
            name: "Brandt Group of Companies".to_string(),
            image: "https://www.brandt.ca/getmedia/d08a5445-9c3f-4e63-8f08-a4d6c4ad7bb5/Brandt-Rallies-Community-Show-They-Care-1140x720.jpg.aspx?width=1440&height=720&ext=.jpg".to_string(),
            description: "Brandt Group is a diverse company involved in various sectors including agriculture and construction. You will be hired to manage front desk operations, answer phones, and assist with administrative tasks within the office.".to_string(),
            location: "Regina, Saskatchewan".to_string(),
            working_hours: "8:00 AM to 5:00 PM, Monday to Friday".to_string(),
        },
    ]
}

/// Check-then-create initialization of the backend tables.
///
/// Not transactional: if the insert fails after the companies table was
/// created, the next run finds a reachable empty table and inserts nothing.
pub struct SeedService {
    company_repo: Arc<dyn CompanyRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl SeedService {
    pub fn new(
        company_repo: Arc<dyn CompanyRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self {
            company_repo,
            user_repo,
        }
    }

    pub async fn initialize(&self) -> Result<SeedReport, ApiError> {
        let mut report = SeedReport::default();

        if let Err(e) = self.company_repo.check_table().await {
            tracing::info!(error = %e, "companies table not reachable, creating it");
            self.company_repo.create_table().await?;
            report.companies_created = true;

            report.companies_inserted = self.company_repo.insert_many(&seed_companies()).await?;
            tracing::info!(
                inserted = report.companies_inserted,
                "seeded companies table"
            );
        }

        if let Err(e) = self.user_repo.check_table().await {
            tracing::info!(error = %e, "users table not reachable, creating it");
            self.user_repo.create_table().await?;
            report.users_created = true;
        }

        tracing::debug!(?report, "database initialization finished");
        Ok(report)
    }
}
