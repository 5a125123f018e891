//! Schema module - Data model and codec configuration types.

mod config;
mod model;

pub use config::*;
pub use model::*;
