use std::path::PathBuf;

use thiserror::Error;

use jutsu_core::CoreError;

pub type Result<T> = std::result::Result<T, JutsuError>;

#[derive(Debug, Error)]
pub enum JutsuError {
    #[error("failed building reqwest client: {0}")]
    BuildClient(#[source] reqwest::Error),

    #[error("HTTP request failed while {context}: {source}")]
    Request {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body while {context}: {source}")]
    ResponseBody {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context} returned {status}")]
    HttpStatus {
        context: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to parse page: {0}")]
    Parse(#[from] CoreError),

    #[error("failed creating directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed downloading {episode}: {source}")]
    Download {
        episode: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Message(String),
}
