//! Probing candidates for live content

pub mod content;
pub mod http;

pub use content::{assess, visible_text, ContentVerdict};
pub use http::HttpProber;

use crate::types::ProbeReport;
use async_trait::async_trait;

/// Trait for anything that can classify a domain
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a domain. Failures are reported as empty, never as errors.
    async fn probe(&self, domain: &str) -> ProbeReport;

    /// Get the prober name
    fn name(&self) -> &'static str;
}
