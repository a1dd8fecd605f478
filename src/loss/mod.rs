pub mod functions;

pub use functions::{CrossEntropy, Loss, SquaredError};
