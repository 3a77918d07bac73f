mod error;
pub use error::ModelError;

mod job;
pub use job::{JobId, JobInput, Outcome};

mod constants;
pub use constants::FAILURE_PREFIX;
