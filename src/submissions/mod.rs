//! # Submissions
//!
//! The submission data model and persistence adapter. Handlers see only
//! the `SubmissionStore` trait; the production implementation speaks
//! PostgREST, the in-memory implementation backs the tests.

pub mod model;
pub mod store;
pub mod supabase;

pub use model::{AcceptedPatch, NewSubmission, PublicSubmission, Submission};
pub use store::{InMemorySubmissionStore, StoreError, SubmissionStore};
pub use supabase::PostgrestStore;
