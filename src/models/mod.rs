pub mod enums;
pub mod patient;
pub mod assessment;
pub mod triage_result;
pub mod ai;

pub use enums::*;
pub use patient::*;
pub use assessment::*;
pub use triage_result::*;
pub use ai::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Priority must be between 1 and 5, got {0}")]
    InvalidPriority(i64),
}
