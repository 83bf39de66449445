//! Service Configuration
//!
//! Explicit configuration constructed once at startup from environment
//! variables and injected into the router state. Never mutated after init.

use thiserror::Error;

/// Configuration errors, fatal at startup
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// The configured database URL could not be parsed
    #[error("Invalid SUPABASE_URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client initialization failed: {0}")]
    HttpClient(String),
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted database (Supabase project URL)
    pub supabase_url: String,

    /// Public key used for inserts and reads
    pub anon_key: String,

    /// Privileged key used for updates and deletes
    pub service_key: String,

    /// Admin shared secret; absence surfaces as a 500 on the login
    /// endpoint rather than a startup failure
    pub master_password: Option<String>,

    /// Exact-match origin allow-list for the sensitive endpoints
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "https://tbilisihc.andrinoff.com".to_string(),
        "https://tbilisi.hackclub.com".to_string(),
        "http://localhost:5173".to_string(), // SvelteKit dev
        "http://localhost:8888".to_string(), // Netlify dev
    ]
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `SUPABASE_SERVICE_KEY` are
    /// required; `MASTER_PASSWORD` and `ALLOWED_ORIGINS` (comma-separated)
    /// are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            match lookup(name) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(ConfigError::MissingVar(name)),
            }
        };

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) if !raw.is_empty() => raw
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            _ => default_allowed_origins(),
        };

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?,
            anon_key: required("SUPABASE_ANON_KEY")?,
            service_key: required("SUPABASE_SERVICE_KEY")?,
            master_password: lookup("MASTER_PASSWORD").filter(|p| !p.is_empty()),
            allowed_origins,
        })
    }
}
