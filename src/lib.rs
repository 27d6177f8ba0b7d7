pub mod config;
pub mod content;
pub mod error;
pub mod loader;
pub mod search;
pub mod session;
pub mod source;

pub use error::{Result, SearchError};
pub use loader::IndexLoader;
pub use session::{SearchOutcome, SearchSession, SearchSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
