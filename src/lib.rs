//! Conditional branch direction predictors driven by branch traces.

pub mod branch;
pub mod error;
pub mod history;
pub mod predictor;
pub mod replay;
pub mod stats;
pub mod trace;

pub use branch::*;
pub use error::*;
pub use history::*;
pub use predictor::*;
pub use replay::*;
pub use trace::*;
