//! Submission model and derived request/response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registrant record in the `submissions` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier, assigned by the database at creation
    pub id: i64,

    /// Registrant name, non-empty at creation
    pub name: String,

    /// Registrant email, non-empty at creation
    pub email: String,

    /// Optional phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Moderation flag; false at creation, mutated only by the update
    /// operation
    pub accepted: bool,

    /// Assigned by the database at creation, immutable
    pub created_at: DateTime<Utc>,
}

/// Create request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Update request body; `accepted` is strictly boolean on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedPatch {
    pub accepted: bool,
}

/// Redacted projection served to the public listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicSubmission {
    pub name: String,
}
