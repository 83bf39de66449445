//! guestlist - event-registration intake and moderation API
//!
//! Six stateless HTTP endpoints over one hosted `submissions` table:
//! create, admin list, public list, accept/unaccept, delete, and an
//! admin shared-secret login. Persistence is delegated to a
//! PostgREST-compatible database; each request issues at most one
//! database call.

pub mod config;
pub mod cors;
pub mod error;
pub mod http_server;
pub mod submissions;
