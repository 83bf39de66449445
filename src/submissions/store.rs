//! Persistence adapter trait and the in-memory implementation.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::RwLock;
use thiserror::Error;

use super::model::{NewSubmission, PublicSubmission, Submission};

/// Store errors, opaque to handlers
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The database could not be reached
    #[error("{0}")]
    Unavailable(String),

    /// The database rejected the call
    #[error("{0}")]
    Rejected(String),
}

/// Persistence operations against the `submissions` table.
///
/// Identifiers travel as raw strings; the store decides what matches.
/// Every method is a single awaited call with no retries.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Insert a new submission; the database assigns id and created_at,
    /// and `accepted` defaults to false
    async fn insert(&self, new: NewSubmission) -> Result<Submission, StoreError>;

    /// All submissions, newest first
    async fn list_all(&self) -> Result<Vec<Submission>, StoreError>;

    /// Names of accepted submissions, newest first
    async fn list_accepted_names(&self) -> Result<Vec<PublicSubmission>, StoreError>;

    /// Set the accepted flag; `None` means no row matched
    async fn set_accepted(&self, id: &str, accepted: bool)
        -> Result<Option<Submission>, StoreError>;

    /// Delete by id; succeeds whether or not a row matched
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    rows: Vec<Submission>,
    next_id: i64,
}

/// In-memory store for testing
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    state: RwLock<InMemoryState>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_desc(rows: &[Submission]) -> Vec<Submission> {
        let mut rows = rows.to_vec();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        rows
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn insert(&self, new: NewSubmission) -> Result<Submission, StoreError> {
        let mut state = self.state.write().unwrap();
        state.next_id += 1;
        let submission = Submission {
            id: state.next_id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            accepted: false,
            created_at: Utc::now(),
        };
        state.rows.push(submission.clone());
        Ok(submission)
    }

    async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
        let state = self.state.read().unwrap();
        Ok(Self::sorted_desc(&state.rows))
    }

    async fn list_accepted_names(&self) -> Result<Vec<PublicSubmission>, StoreError> {
        let state = self.state.read().unwrap();
        let accepted: Vec<Submission> = state
            .rows
            .iter()
            .filter(|row| row.accepted)
            .cloned()
            .collect();
        Ok(Self::sorted_desc(&accepted)
            .into_iter()
            .map(|row| PublicSubmission { name: row.name })
            .collect())
    }

    async fn set_accepted(
        &self,
        id: &str,
        accepted: bool,
    ) -> Result<Option<Submission>, StoreError> {
        // Unparseable ids match no rows
        let Ok(id) = id.parse::<i64>() else {
            return Ok(None);
        };
        let mut state = self.state.write().unwrap();
        match state.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.accepted = accepted;
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let Ok(id) = id.parse::<i64>() else {
            return Ok(());
        };
        let mut state = self.state.write().unwrap();
        state.rows.retain(|row| row.id != id);
        Ok(())
    }
}
