use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server answered {status} for {url}")]
    Status { status: StatusCode, url: String },
}
