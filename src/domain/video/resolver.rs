//! Resolver trait - the external metadata extraction tool

use async_trait::async_trait;

use super::entity::SourceUrl;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Runs the external extraction tool for one source URL.
///
/// Implementations return the raw standard output of a single invocation,
/// expected to hold exactly one JSON document. Launch failures, non-zero
/// exits, timeouts and empty output are reported as
/// [`DomainError::ResolutionFailed`]. Nothing is retried.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MetadataResolver: Send + Sync + std::fmt::Debug {
    /// Resolve the source URL into the raw resolver output
    async fn resolve(&self, url: &SourceUrl) -> Result<Vec<u8>, DomainError>;
}
