use crate::regression::errors::{EstimationError, InputError};
use thiserror::Error;

pub type SweepResult<T> = Result<T, SweepError>;

/// Failures around a sweep: reading its configuration and running it.
/// Individual fit failures are recorded in the results, not raised.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Failed to read sweep config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse sweep config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid sweep config: {0}")]
    InvalidConfig(#[from] InputError),

    #[error(transparent)]
    Estimation(#[from] EstimationError),
}
