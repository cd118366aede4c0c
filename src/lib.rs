//! Domain Prober - find live websites among generated domain names
//!
//! Candidates come from a word list and from exhaustive short-name
//! combinations. Each one is fetched over HTTP(S); sites with real content go
//! to a browsable list, the rest are remembered so later runs skip them.

pub mod domain;
pub mod error;
pub mod generate;
pub mod probe;
pub mod scan;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{ProbeError, Result};
pub use types::{
    Classification, ProbeConfig, ProbeReport, RunSummary, ScanConfig, Scheme, StoreConfig,
};

// Re-export main functionality
pub use generate::{Candidates, Charset, ComboGenerator, DictionaryGenerator};
pub use probe::{HttpProber, Prober};
pub use scan::Scanner;
pub use store::ResultStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
