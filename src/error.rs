use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("API Error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network Error: Unable to reach API at {base_url}")]
    Network { base_url: String },

    #[error("Request Error: {0}")]
    Request(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Update check failed: {0}")]
    UpdateCheck(String),

    #[error("Could not determine installation directory")]
    InstallDirNotFound,

    #[error("Update failed: {0}")]
    UpdateFailed(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
