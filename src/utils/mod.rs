// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod clock;
pub mod logging;
pub mod telemetry;
pub mod validation;

pub use clock::{Clock, SystemClock};
pub use telemetry::OperationTimer;
pub use validation::Validator;
