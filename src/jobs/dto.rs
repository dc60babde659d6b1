use serde::Deserialize;

/// Request body for creating a job posting.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
}

/// Partial update of a job posting.
#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
    pub is_open: Option<bool>,
}
