//! SQLite replica-set implementation of [`TranslationStore`].

use futures_util::stream::{self, BoxStream, StreamExt};
use glossa_core::{
    config::{Consistency, StoreConfig},
    error::StoreError,
    traits::{RowStream, TranslationStore},
    translation::{LookupRequest, TranslationRow},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Batched lookup. The key set is bound as one JSON array so the statement
/// text stays fixed however many keys are requested.
const LOOKUP_SQL: &str = "SELECT name, value FROM translation \
     WHERE lang = ? AND site_id = ? AND name IN (SELECT value FROM json_each(?))";

/// One replica: the node address and its connection pool.
struct Replica {
    node: String,
    pool: SqlitePool,
}

/// Translation store spread over read-only SQLite replicas.
///
/// Pools connect lazily, so an unreachable replica only fails the requests
/// routed to it.
pub struct SqliteStore {
    replicas: Vec<Replica>,
    timeout: Duration,
    consistency: Consistency,
    next: AtomicUsize,
}

impl SqliteStore {
    /// Build one pool per configured node, opening `<node>/<keyspace>.db` read-only.
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.nodes.is_empty() {
            return Err(StoreError::Connect {
                node: String::new(),
                message: "no store nodes configured".into(),
            });
        }

        let timeout = config.timeout();
        let mut replicas = Vec::with_capacity(config.nodes.len());
        for node in &config.nodes {
            let db_path = Path::new(node).join(format!("{}.db", config.keyspace));
            let opts = SqliteConnectOptions::new()
                .filename(&db_path)
                .read_only(true)
                .create_if_missing(false)
                .busy_timeout(timeout);

            let pool = SqlitePoolOptions::new()
                .max_connections(config.connections_per_node)
                .acquire_timeout(timeout)
                .connect_lazy_with(opts);

            debug!("store replica {node} -> {}", db_path.display());
            replicas.push(Replica {
                node: node.clone(),
                pool,
            });
        }

        info!(
            "translation store ready: {} replica(s), keyspace {}, timeout {}ms, consistency {:?}",
            replicas.len(),
            config.keyspace,
            config.timeout_ms,
            config.consistency
        );

        Ok(Self {
            replicas,
            timeout,
            consistency: config.consistency,
            next: AtomicUsize::new(0),
        })
    }

    /// Close every replica pool, waiting for checked-out connections.
    pub async fn close(&self) {
        for replica in &self.replicas {
            replica.pool.close().await;
        }
    }

    /// Pick the replica that answers the next read.
    fn pick(&self) -> &Replica {
        match self.consistency {
            Consistency::LocalOne => &self.replicas[0],
            Consistency::One => {
                let i = self.next.fetch_add(1, Ordering::Relaxed) % self.replicas.len();
                &self.replicas[i]
            }
        }
    }
}

impl TranslationStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn lookup(&self, request: &LookupRequest) -> RowStream<'_> {
        let replica = self.pick();
        let keys = match serde_json::to_string(&request.keys) {
            Ok(k) => k,
            Err(e) => {
                let err = StoreError::Query(format!("failed to encode keys: {e}"));
                return stream::once(async move { Err(err) }).boxed();
            }
        };

        debug!(
            "lookup on {}: lang={} site={} keys={}",
            replica.node,
            request.language,
            request.site_id,
            request.keys.len()
        );

        let rows = sqlx::query_as::<_, (String, String)>(LOOKUP_SQL)
            .bind(request.language.clone())
            .bind(request.site_id)
            .bind(keys)
            .fetch(&replica.pool);

        bounded(rows, self.timeout)
    }
}

/// Apply the per-operation timeout to every fetch and stop after the first error.
fn bounded<'a>(
    rows: BoxStream<'a, Result<(String, String), sqlx::Error>>,
    timeout: Duration,
) -> RowStream<'a> {
    stream::unfold(Some(rows), move |state| async move {
        let Some(mut rows) = state else {
            return None;
        };
        match tokio::time::timeout(timeout, rows.next()).await {
            Ok(Some(Ok((name, value)))) => Some((Ok(TranslationRow { name, value }), Some(rows))),
            Ok(Some(Err(e))) => Some((Err(query_error(e, timeout)), None)),
            Ok(None) => None,
            Err(_) => Some((Err(StoreError::Timeout(timeout)), None)),
        }
    })
    .boxed()
}

fn query_error(e: sqlx::Error, timeout: Duration) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(timeout),
        other => StoreError::Query(other.to_string()),
    }
}
