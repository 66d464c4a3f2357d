//! Generic batch enrichment engine.
//!
//! Given a set of identifiers and a per-identifier fetch, produces an
//! identifier → data map under bounded concurrency. Identifiers are
//! partitioned into sequential batches, each batch into chunks of at most
//! `max_concurrent`; all fetches in a chunk run concurrently and the engine
//! waits for every one of them before moving on, so no more than
//! `max_concurrent` requests are in flight at any instant. A sleep between
//! chunks keeps the request rate under upstream limits.
//!
//! A single identifier's failure is never fatal: it is logged and resolved to
//! the caller-supplied fallback value, so the result map covers every input
//! identifier. Missing category or stock data degrades the export but does
//! not invalidate it.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use futures::future::join_all;

use crate::error::CommerceError;

/// Throughput tuning for one enrichment run.
#[derive(Debug, Clone, Copy)]
pub struct EnrichOptions {
    /// Identifiers per sequential batch.
    pub batch_size: usize,
    /// Maximum fetches in flight at once (chunk width).
    pub max_concurrent: usize,
    /// Sleep between consecutive chunks, in milliseconds.
    pub inter_chunk_delay_ms: u64,
}

/// Fetches data for every identifier in `ids`, substituting `fallback(id)`
/// for any identifier whose fetch fails.
///
/// The returned map holds exactly one entry per distinct input identifier;
/// no identifier is silently dropped. `fetch` is called exactly once per
/// identifier (any retrying happens inside the fetch itself).
pub async fn enrich_in_batches<I, T, F, Fut, D>(
    ids: impl IntoIterator<Item = I>,
    opts: &EnrichOptions,
    fetch: F,
    fallback: D,
) -> HashMap<I, T>
where
    I: Clone + Eq + Hash + Display,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, CommerceError>>,
    D: Fn(&I) -> T,
{
    let ids: Vec<I> = ids.into_iter().collect();
    let batch_size = opts.batch_size.max(1);
    let max_concurrent = opts.max_concurrent.max(1);

    let mut results: HashMap<I, T> = HashMap::with_capacity(ids.len());
    let mut first_chunk = true;

    for batch in ids.chunks(batch_size) {
        for chunk in batch.chunks(max_concurrent) {
            if !first_chunk && opts.inter_chunk_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(opts.inter_chunk_delay_ms)).await;
            }
            first_chunk = false;

            let fetches = chunk.iter().map(|id| {
                let fut = fetch(id.clone());
                async move { (id, fut.await) }
            });

            for (id, outcome) in join_all(fetches).await {
                match outcome {
                    Ok(value) => {
                        results.insert(id.clone(), value);
                    }
                    Err(error) => {
                        tracing::warn!(
                            identifier = %id,
                            error = %error,
                            "enrichment fetch failed; substituting default value"
                        );
                        results.insert(id.clone(), fallback(id));
                    }
                }
            }
        }
    }

    results
}
