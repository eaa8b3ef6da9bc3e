use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("account {0} not found")]
    NotFound(String),

    #[error("account file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("account file {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
