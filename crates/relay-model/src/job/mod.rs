mod id;
pub use id::JobId;

mod input;
pub use input::JobInput;

mod outcome;
pub use outcome::Outcome;
