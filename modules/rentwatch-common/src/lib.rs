pub mod config;
pub mod scoring;
pub mod types;

pub use config::Config;
pub use scoring::*;
pub use types::*;
