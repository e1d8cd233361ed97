use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod topics;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use topics::{load_topics, TopicsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read topics file {path}: {source}")]
    TopicsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse topics file: {0}")]
    TopicsFileParse(#[from] serde_yaml::Error),

    #[error("topics validation failed: {0}")]
    Validation(String),
}
