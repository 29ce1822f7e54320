use thiserror::Error;

pub type Result<T> = std::result::Result<T, MigrateError>;

const MAX_BODY_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("{var} is not set; export it before running the migration")]
    MissingCredential { var: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },
}

impl MigrateError {
    /// Configuration errors abort the run; everything else is per-item.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MigrateError::MissingCredential { .. } | MigrateError::InvalidConfig(_)
        )
    }

    pub fn status(method: &'static str, url: String, status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = if body.chars().count() > MAX_BODY_CHARS {
            let cut: String = body.chars().take(MAX_BODY_CHARS).collect();
            format!("{cut}...")
        } else {
            body.to_string()
        };
        MigrateError::Status {
            method,
            url,
            status,
            body,
        }
    }
}
