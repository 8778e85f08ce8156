use thiserror::Error;

#[derive(Debug, Error)]
pub enum PetriError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Snapshot parse error: {0}")]
    SnapshotParse(#[from] serde_json::Error),
}

pub type PetriResult<T> = Result<T, PetriError>;
