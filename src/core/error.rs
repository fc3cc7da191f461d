use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnatomyError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown body template: {0}")]
    UnknownTemplate(String),

    #[error("Invalid body template {template}: {reason}")]
    InvalidTemplate { template: String, reason: String },
}

pub type Result<T> = std::result::Result<T, AnatomyError>;
