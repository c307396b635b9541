pub mod company;

pub use company::{Company, CompanyPatch, CompanySearchFilters, CompanyWithJobs, JobSummary, NewCompany};
