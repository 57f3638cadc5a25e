/// Groove CLI - headless player sessions over a JSON catalog
pub mod config;
pub mod error;
pub mod session;

pub use config::GrooveConfig;
pub use error::{CliError, Result};
pub use session::{load_catalog, run, PlayOptions, SessionReport};
