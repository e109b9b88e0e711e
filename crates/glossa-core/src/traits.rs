use crate::{
    error::StoreError,
    translation::{LookupRequest, TranslationRow},
};
use futures_util::stream::BoxStream;

/// Lazy, finite, non-restartable sequence of rows from one batched lookup.
///
/// Consumers stop at exhaustion or at the first `Err`.
pub type RowStream<'a> = BoxStream<'a, Result<TranslationRow, StoreError>>;

/// Translation store trait — the backing data source.
///
/// Implementations are shared by every in-flight request and must be safe
/// for concurrent use.
pub trait TranslationStore: Send + Sync {
    /// Human-readable store name.
    fn name(&self) -> &str;

    /// Look up every row matching the request's language, site, and any of its keys.
    ///
    /// Must be a single round trip regardless of how many keys are requested.
    /// Failures to issue the query surface as the first item of the stream.
    fn lookup(&self, request: &LookupRequest) -> RowStream<'_>;
}
