use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{domain::ElementId, error::ApiError};

/// Validated contact form values as delivered to a submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub submission_id: Uuid,
    pub form_id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub consent: bool,
    pub submitted_at: DateTime<Utc>,
}

impl ContactSubmission {
    pub fn new(form_id: ElementId) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            form_id,
            name: None,
            email: None,
            phone: None,
            subject: None,
            message: None,
            consent: false,
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionResponse {
    Accepted {
        submission_id: Uuid,
    },
    Rejected {
        #[serde(flatten)]
        error: ApiError,
    },
}
