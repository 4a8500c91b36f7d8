//! Plain records persisted alongside calculations: the status-check log
//! and concepts-page access leads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RecordError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

impl StatusCheck {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name: client_name.into(),
            timestamp: Utc::now(),
        }
    }
}

impl From<StatusCheckCreate> for StatusCheck {
    fn from(create: StatusCheckCreate) -> Self {
        Self::new(create.client_name)
    }
}

/// A visitor who filled in the concepts access form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptAccess {
    pub id: String,
    pub fullname: String,
    pub email: String,
    pub zip: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConceptAccessCreate {
    pub fullname: String,
    pub email: String,
    pub zip: String,
}

impl ConceptAccessCreate {
    /// Reject blank names and addresses that are not `local@domain`.
    ///
    /// # Errors
    /// Returns [`RecordError::InvalidField`] naming the offending field.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.fullname.trim().is_empty() {
            return Err(RecordError::InvalidField {
                field: "fullname",
                message: "must not be empty".into(),
            });
        }
        if !is_plausible_email(&self.email) {
            return Err(RecordError::InvalidField {
                field: "email",
                message: format!("'{}' is not a valid email address", self.email),
            });
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

impl From<ConceptAccessCreate> for ConceptAccess {
    fn from(create: ConceptAccessCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fullname: create.fullname.trim().to_string(),
            email: create.email.trim().to_string(),
            zip: create.zip.trim().to_string(),
            timestamp: Utc::now(),
        }
    }
}
