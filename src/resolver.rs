//! Batched lookup with deterministic fallbacks, and XML rendering of the result.

use futures_util::StreamExt;
use glossa_core::error::GatewayError;
use glossa_core::traits::TranslationStore;
use glossa_core::translation::{LookupRequest, ResolvedTranslation};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Resolves translation keys against a shared store.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn TranslationStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn TranslationStore>) -> Self {
        Self { store }
    }

    /// Resolve every distinct requested key exactly once.
    ///
    /// Hits come first in the order the store returned them; the first row
    /// for a key wins and later rows for it are dropped. Keys the store did
    /// not return follow as fallbacks, in request order. Any store error
    /// aborts the whole lookup.
    pub async fn resolve(
        &self,
        request: &LookupRequest,
    ) -> Result<Vec<ResolvedTranslation>, GatewayError> {
        let mut pending: HashSet<&str> = request.keys.iter().map(String::as_str).collect();
        let mut resolved = Vec::with_capacity(pending.len());

        let mut rows = self.store.lookup(request);
        while let Some(row) = rows.next().await {
            let row = row?;
            if pending.remove(row.name.as_str()) {
                resolved.push(ResolvedTranslation::hit(row));
            } else {
                debug!(
                    "{}: dropping row for {:?}, already resolved or not requested",
                    self.store.name(),
                    row.name
                );
            }
        }

        for key in &request.keys {
            if pending.remove(key.as_str()) {
                resolved.push(ResolvedTranslation::fallback(request, key));
            }
        }

        Ok(resolved)
    }
}

/// Escape XML special characters for element text and attribute values.
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Render resolved translations as the `<translations>` document.
pub fn render_xml(entries: &[ResolvedTranslation]) -> String {
    let mut out = String::from(XML_HEADER);
    out.push_str("<translations>");
    for entry in entries {
        out.push_str(&format!(
            "<translation name=\"{}\">{}</translation>",
            xml_escape(&entry.name),
            xml_escape(&entry.value)
        ));
    }
    out.push_str("</translations>");
    out
}
