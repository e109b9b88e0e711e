//! In-memory store and log capture for tests.

use futures_util::stream::{self, StreamExt};
use glossa_core::error::StoreError;
use glossa_core::traits::{RowStream, TranslationStore};
use glossa_core::translation::{LookupRequest, TranslationRow};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Counts lookups and can fail mid-stream.
#[derive(Default)]
pub(crate) struct FakeStore {
    rows: Vec<(String, i64, TranslationRow)>,
    /// Yield this many rows, then an error with the given message.
    fail_after: Option<(usize, String)>,
    calls: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_row(mut self, lang: &str, site_id: i64, name: &str, value: &str) -> Self {
        self.rows.push((
            lang.to_string(),
            site_id,
            TranslationRow {
                name: name.to_string(),
                value: value.to_string(),
            },
        ));
        self
    }

    pub(crate) fn failing_after(mut self, rows: usize, message: &str) -> Self {
        self.fail_after = Some((rows, message.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TranslationStore for FakeStore {
    fn name(&self) -> &str {
        "fake"
    }

    fn lookup(&self, request: &LookupRequest) -> RowStream<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut items: Vec<Result<TranslationRow, StoreError>> = self
            .rows
            .iter()
            .filter(|(lang, site, row)| {
                *lang == request.language
                    && *site == request.site_id
                    && request.keys.contains(&row.name)
            })
            .map(|(_, _, row)| Ok(row.clone()))
            .collect();

        if let Some((n, message)) = &self.fail_after {
            items.truncate(*n);
            items.push(Err(StoreError::Query(message.clone())));
        }

        stream::iter(items).boxed()
    }
}

/// Records the fields of every event emitted while installed.
#[derive(Clone, Default)]
pub(crate) struct Captured(Arc<Mutex<Vec<HashMap<String, String>>>>);

impl Captured {
    /// Events whose message starts with `prefix`.
    pub(crate) fn matching(&self, prefix: &str) -> Vec<HashMap<String, String>> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.get("message").is_some_and(|m| m.starts_with(prefix)))
            .cloned()
            .collect()
    }
}

struct FieldMap(HashMap<String, String>);

impl Visit for FieldMap {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: tracing::Subscriber> Layer<S> for Captured {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldMap(HashMap::new());
        event.record(&mut fields);
        self.0.lock().unwrap().push(fields.0);
    }
}

/// Install a capturing subscriber for the current thread.
pub(crate) fn capture_logs() -> (Captured, tracing::subscriber::DefaultGuard) {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::registry().with(captured.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (captured, guard)
}
