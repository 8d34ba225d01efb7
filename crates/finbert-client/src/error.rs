use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinbertError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

pub type FinbertResult<T> = Result<T, FinbertError>;
