use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::store::{CompanyStore, StoreError};
use crate::models::{Company, CompanyPatch, CompanySearchFilters, CompanyWithJobs, JobSummary, NewCompany};

#[derive(Default)]
struct Tables {
    companies: BTreeMap<String, Company>,
    /// (company handle, job), in insertion (id) order
    jobs: Vec<(String, JobSummary)>,
    next_job_id: i32,
}

/// In-process store with the same contract as the Postgres store.
/// Each operation runs under one lock acquisition.
#[derive(Default)]
pub struct MemoryCompanyStore {
    tables: RwLock<Tables>,
}

impl MemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a job to an existing company, returning the job with its assigned id.
    pub async fn add_job(
        &self,
        company_handle: &str,
        title: impl Into<String>,
        salary: Option<i32>,
        equity: Option<&str>,
    ) -> Result<JobSummary, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.companies.contains_key(company_handle) {
            return Err(StoreError::company_not_found(company_handle));
        }

        tables.next_job_id += 1;
        let job = JobSummary {
            id: tables.next_job_id,
            title: title.into(),
            salary,
            equity: equity.map(str::to_string),
        };
        tables.jobs.push((company_handle.to_string(), job.clone()));
        Ok(job)
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.companies.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CompanyStore for MemoryCompanyStore {
    async fn create(&self, company: NewCompany) -> Result<Company, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.companies.contains_key(&company.handle) {
            return Err(StoreError::duplicate_handle(&company.handle));
        }
        if tables.companies.values().any(|c| c.name == company.name) {
            return Err(StoreError::duplicate_name(&company.name));
        }

        let company = Company::from(company);
        tables.companies.insert(company.handle.clone(), company.clone());
        Ok(company)
    }

    async fn find_all(&self, filters: &CompanySearchFilters) -> Result<Vec<Company>, StoreError> {
        let tables = self.tables.read().await;
        let mut found: Vec<Company> = tables
            .companies
            .values()
            .filter(|c| filters.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn get(&self, handle: &str) -> Result<CompanyWithJobs, StoreError> {
        let tables = self.tables.read().await;
        let company = tables
            .companies
            .get(handle)
            .cloned()
            .ok_or_else(|| StoreError::company_not_found(handle))?;

        let jobs = tables
            .jobs
            .iter()
            .filter(|(owner, _)| owner == handle)
            .map(|(_, job)| job.clone())
            .collect();

        Ok(CompanyWithJobs { company, jobs })
    }

    async fn update(&self, handle: &str, patch: CompanyPatch) -> Result<Company, StoreError> {
        let mut tables = self.tables.write().await;

        if let Some(ref name) = patch.name {
            if tables.companies.values().any(|c| &c.name == name && c.handle != handle) {
                return Err(StoreError::duplicate_name(name));
            }
        }

        let company = tables
            .companies
            .get_mut(handle)
            .ok_or_else(|| StoreError::company_not_found(handle))?;
        patch.apply_to(company);
        Ok(company.clone())
    }

    async fn remove(&self, handle: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .companies
            .remove(handle)
            .ok_or_else(|| StoreError::company_not_found(handle))?;
        // Jobs go with their company
        tables.jobs.retain(|(owner, _)| owner != handle);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_company(handle: &str, name: &str, num_employees: Option<i32>) -> NewCompany {
        NewCompany {
            handle: handle.to_string(),
            name: name.to_string(),
            description: format!("{} description", name),
            num_employees,
            logo_url: None,
        }
    }

    async fn seeded() -> MemoryCompanyStore {
        let store = MemoryCompanyStore::new();
        store.create(new_company("c3", "C3", Some(300))).await.unwrap();
        store.create(new_company("c1", "C1", Some(100))).await.unwrap();
        store.create(new_company("c2", "C2", None)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn create_then_get_round_trips_fields() {
        let store = MemoryCompanyStore::new();
        let created = store.create(new_company("acme", "Acme", Some(10))).await.unwrap();
        let fetched = store.get("acme").await.unwrap();
        assert_eq!(fetched.company, created);
        assert!(fetched.jobs.is_empty());
    }

    #[tokio::test]
    async fn duplicate_handle_and_name_conflict() {
        let store = seeded().await;
        assert!(matches!(
            store.create(new_company("c1", "Other", None)).await,
            Err(StoreError::Conflict(msg)) if msg == "Duplicate company: c1"
        ));
        assert!(matches!(
            store.create(new_company("other", "C1", None)).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn find_all_orders_by_name_and_filters() {
        let store = seeded().await;
        let all = store.find_all(&CompanySearchFilters::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C1", "C2", "C3"]);

        let bounded = store
            .find_all(&CompanySearchFilters {
                min_employees: Some(150),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].handle, "c3");
    }

    #[tokio::test]
    async fn get_includes_jobs_in_id_order() {
        let store = seeded().await;
        store.add_job("c1", "Engineer", Some(100_000), Some("0.05")).await.unwrap();
        store.add_job("c2", "Elsewhere", None, None).await.unwrap();
        store.add_job("c1", "Designer", None, None).await.unwrap();

        let fetched = store.get("c1").await.unwrap();
        let titles: Vec<_> = fetched.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Engineer", "Designer"]);
        assert!(fetched.jobs[0].id < fetched.jobs[1].id);
    }

    #[tokio::test]
    async fn update_patches_and_reports_missing() {
        let store = seeded().await;
        let updated = store
            .update(
                "c1",
                CompanyPatch {
                    num_employees: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.num_employees, Some(5));
        assert_eq!(updated.name, "C1");

        assert!(matches!(
            store.update("ghost", CompanyPatch::default()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_to_taken_name_reports_the_name() {
        let store = seeded().await;
        let result = store
            .update(
                "c1",
                CompanyPatch {
                    name: Some("C2".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(msg)) if msg == "Duplicate company name: C2"));

        // Renaming to its own name is not a conflict
        let same = CompanyPatch {
            name: Some("C1".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update("c1", same).await.unwrap().name, "C1");
    }

    #[tokio::test]
    async fn remove_twice_is_not_found() {
        let store = seeded().await;
        store.add_job("c1", "Engineer", None, None).await.unwrap();
        store.remove("c1").await.unwrap();
        assert!(matches!(store.remove("c1").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.get("c1").await, Err(StoreError::NotFound(_))));
    }
}
