use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sqlx::PgPool;

use crate::database::query_builder::QueryBuilder;
use crate::database::store::{CompanyStore, StoreError};
use crate::filter::FilterData;
use crate::models::{Company, CompanyPatch, CompanySearchFilters, CompanyWithJobs, JobSummary, NewCompany};

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

pub struct PgCompanyStore {
    pool: PgPool,
}

impl PgCompanyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select_columns() -> Vec<String> {
        COMPANY_COLUMNS.split(", ").map(str::to_string).collect()
    }

    /// Translate search filters into the filter engine's where-clause document.
    pub fn search_filter_data(filters: &CompanySearchFilters) -> FilterData {
        let mut where_clause = Map::new();

        if let Some(ref name_like) = filters.name_like {
            where_clause.insert(
                "name".to_string(),
                json!({ "$ilike": format!("%{}%", escape_like(name_like)) }),
            );
        }

        let mut employees = Map::new();
        if let Some(min) = filters.min_employees {
            employees.insert("$gte".to_string(), json!(min));
        }
        if let Some(max) = filters.max_employees {
            employees.insert("$lte".to_string(), json!(max));
        }
        if !employees.is_empty() {
            where_clause.insert("num_employees".to_string(), Value::Object(employees));
        }

        FilterData {
            select: Some(Self::select_columns()),
            where_clause: (!where_clause.is_empty()).then(|| Value::Object(where_clause)),
            order: Some(json!("name")),
        }
    }

    fn by_handle(handle: &str) -> FilterData {
        FilterData {
            select: Some(Self::select_columns()),
            where_clause: Some(json!({ "handle": handle })),
            order: None,
        }
    }

    fn map_insert_error(err: sqlx::Error, company: &NewCompany) -> StoreError {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return match db_err.constraint() {
                    Some("companies_name_key") => StoreError::duplicate_name(&company.name),
                    _ => StoreError::duplicate_handle(&company.handle),
                };
            }
        }
        StoreError::Database(err)
    }
}

/// Escape LIKE metacharacters so user input matches literally
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl CompanyStore for PgCompanyStore {
    async fn create(&self, company: NewCompany) -> Result<Company, StoreError> {
        let sql = format!(
            "INSERT INTO companies ({cols}) VALUES ($1, $2, $3, $4, $5) RETURNING {cols}",
            cols = COMPANY_COLUMNS
        );

        sqlx::query_as::<_, Company>(&sql)
            .bind(&company.handle)
            .bind(&company.name)
            .bind(&company.description)
            .bind(company.num_employees)
            .bind(&company.logo_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::map_insert_error(e, &company))
    }

    async fn find_all(&self, filters: &CompanySearchFilters) -> Result<Vec<Company>, StoreError> {
        QueryBuilder::<Company>::new("companies")?
            .filter(Self::search_filter_data(filters))?
            .select_all(&self.pool)
            .await
    }

    async fn get(&self, handle: &str) -> Result<CompanyWithJobs, StoreError> {
        let company = QueryBuilder::<Company>::new("companies")?
            .filter(Self::by_handle(handle))?
            .select_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::company_not_found(handle))?;

        let jobs = sqlx::query_as::<_, JobSummary>(
            r#"
            SELECT id, title, salary, equity::text AS equity
            FROM jobs
            WHERE company_handle = $1
            ORDER BY id
            "#,
        )
        .bind(handle)
        .fetch_all(&self.pool)
        .await?;

        Ok(CompanyWithJobs { company, jobs })
    }

    async fn update(&self, handle: &str, patch: CompanyPatch) -> Result<Company, StoreError> {
        if patch.is_empty() {
            return self.get(handle).await.map(|found| found.company);
        }

        let new_name = patch.name.clone();
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE companies SET ");
        {
            let mut assignments = qb.separated(", ");
            if let Some(name) = patch.name {
                assignments.push("name = ").push_bind_unseparated(name);
            }
            if let Some(description) = patch.description {
                assignments.push("description = ").push_bind_unseparated(description);
            }
            if let Some(num_employees) = patch.num_employees {
                assignments.push("num_employees = ").push_bind_unseparated(num_employees);
            }
            if let Some(logo_url) = patch.logo_url {
                assignments.push("logo_url = ").push_bind_unseparated(logo_url);
            }
        }
        qb.push(" WHERE handle = ")
            .push_bind(handle.to_string())
            .push(" RETURNING ")
            .push(COMPANY_COLUMNS);

        match qb.build_query_as::<Company>().fetch_optional(&self.pool).await {
            Ok(Some(company)) => Ok(company),
            Ok(None) => Err(StoreError::company_not_found(handle)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::duplicate_name(new_name.as_deref().unwrap_or_default()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, handle: &str) -> Result<(), StoreError> {
        let removed: Option<(String,)> = sqlx::query_as("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?;

        removed.map(|_| ()).ok_or_else(|| StoreError::company_not_found(handle))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
