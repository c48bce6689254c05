pub mod config;
pub mod error;
pub mod ids;
pub mod types;

pub use error::{HypeCycleError, Result};
pub use ids::*;
