//! Data models

pub mod configuration;
pub mod manifest;
pub mod payload;
pub mod reward;

pub use configuration::*;
pub use manifest::*;
pub use payload::*;
pub use reward::*;
