pub mod config;
pub mod denylist;
pub mod error;
pub mod rubric;
pub mod types;

pub use config::Config;
pub use denylist::*;
pub use error::VetrinaError;
pub use rubric::*;
pub use types::*;
