use crate::error::PickupError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inputs collected for one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub subject_name: String,
    pub project_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl QuerySpec {
    pub fn new(
        subject_name: impl Into<String>,
        project_name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            project_name: project_name.into(),
            start_date,
            end_date,
        }
    }

    pub fn query(&self) -> Result<String, PickupError> {
        build_query(&self.subject_name, &self.project_name)
    }

    /// Providers receive the range as given; an inverted range is not rejected.
    pub fn is_inverted(&self) -> bool {
        self.start_date > self.end_date
    }
}

/// Joins the trimmed subject and project names with a single space.
pub fn build_query(subject_name: &str, project_name: &str) -> Result<String, PickupError> {
    let subject = subject_name.trim();
    let project = project_name.trim();

    if subject.is_empty() {
        return Err(PickupError::InvalidQuery(
            "please enter a client name".to_string(),
        ));
    }
    if project.is_empty() {
        return Err(PickupError::InvalidQuery(
            "please enter a project/film name".to_string(),
        ));
    }

    Ok(format!("{} {}", subject, project))
}
