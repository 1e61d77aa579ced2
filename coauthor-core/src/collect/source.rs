use crate::error::CollectError;
use crate::types::{ArticleId, RawArticle};

/// A literature service answering the two requests the collector needs.
///
/// Implementations do no pacing and no retrying; the collector owns the call
/// sequence and the waits between calls.
#[async_trait::async_trait(?Send)]
pub trait LiteratureSource {
    /// Human-readable name for this source.
    fn name(&self) -> &'static str;

    /// Identifiers of up to `max_results` records attributed to `author`.
    async fn search(&self, author: &str, max_results: u32) -> Result<Vec<ArticleId>, CollectError>;

    /// Author lists for a batch of identifiers.
    async fn fetch(&self, ids: &[ArticleId]) -> Result<Vec<RawArticle>, CollectError>;
}
