use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("job id cannot be empty")]
    EmptyJobId,
}
