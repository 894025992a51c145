use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing {element} on {page} page")]
    MissingElement {
        page: &'static str,
        element: &'static str,
    },

    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },
}
