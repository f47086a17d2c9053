use thiserror::Error;

/// Errors raised anywhere in the resolve → load → render pipeline.
///
/// Every variant is fatal for a build: nothing downstream catches or retries
/// them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Post not found: {slug}")]
    NotFound { slug: String },

    #[error("Failed to load {identifier}: {reason}")]
    Load { identifier: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub fn load(identifier: impl Into<String>, reason: impl ToString) -> Self {
        Error::Load {
            identifier: identifier.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
