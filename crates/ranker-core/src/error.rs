use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("data source error: {0}")]
    DataSource(String),

    #[error("sentiment model error: {0}")]
    Model(String),

    #[error("analysis task failed: {0}")]
    Task(String),
}
