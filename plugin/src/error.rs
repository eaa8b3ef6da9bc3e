use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("account error: {0}")]
    Account(#[from] steward_accounts::AccountError),

    #[error("config error: {0}")]
    Config(String),

    #[error("locale error: {0}")]
    Locale(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
