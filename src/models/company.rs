use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A company as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Job summary attached to a single-company fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    /// NUMERIC rendered as text
    pub equity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyWithJobs {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

/// Body of `POST /companies`, already checked against the companyNew schema
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl From<NewCompany> for Company {
    fn from(new: NewCompany) -> Self {
        Self {
            handle: new.handle,
            name: new.name,
            description: new.description,
            num_employees: new.num_employees,
            logo_url: new.logo_url,
        }
    }
}

/// Body of `PATCH /companies/:handle`. `handle` is never part of a patch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.num_employees.is_none()
            && self.logo_url.is_none()
    }

    pub fn apply_to(self, company: &mut Company) {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(description) = self.description {
            company.description = description;
        }
        if let Some(num_employees) = self.num_employees {
            company.num_employees = Some(num_employees);
        }
        if let Some(logo_url) = self.logo_url {
            company.logo_url = Some(logo_url);
        }
    }
}

/// Normalized filters for `GET /companies`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearchFilters {
    pub name_like: Option<String>,
    pub min_employees: Option<i64>,
    pub max_employees: Option<i64>,
}

impl CompanySearchFilters {
    pub fn is_empty(&self) -> bool {
        self.name_like.is_none() && self.min_employees.is_none() && self.max_employees.is_none()
    }

    /// Both bounds present and inverted
    pub fn has_inverted_bounds(&self) -> bool {
        matches!((self.min_employees, self.max_employees), (Some(min), Some(max)) if min > max)
    }

    /// In-process evaluation of the filters, mirroring the SQL predicate.
    /// A company without an employee count never satisfies a bound.
    pub fn matches(&self, company: &Company) -> bool {
        if let Some(ref needle) = self.name_like {
            if !company.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }

        let employees = company.num_employees.map(i64::from);
        if let Some(min) = self.min_employees {
            if !employees.is_some_and(|n| n >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_employees {
            if !employees.is_some_and(|n| n <= max) {
                return false;
            }
        }

        true
    }
}
