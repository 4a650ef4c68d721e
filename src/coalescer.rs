//! Keyed single-flight over in-progress asynchronous work (spec §4.1).
//!
//! At most one concurrent `thunk` runs per key; all callers arriving during
//! one in-flight window observe the same outcome. Failures are not cached —
//! a retry after failure runs a fresh `thunk`. The entry is removed the
//! moment the operation settles, win or lose, so subsequent calls start
//! fresh work. This performs no caching, no retry and no timeout; it is
//! pure deduplication, the async equivalent of the teacher's
//! `tokio::sync::RwLock`-guarded maps in `whois.rs`'s TLD-server cache, but
//! scoped to in-flight work rather than resolved values.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

/// A single entry in the coalescer map: a broadcast channel that every
/// waiting caller subscribes to, fed by whichever caller is actually
/// driving the `thunk`.
struct InFlight<V> {
    sender: broadcast::Sender<Result<V, Arc<String>>>,
}

/// Deduplicates concurrent calls keyed by `K`, each producing a value `V`.
///
/// `V` must be `Clone` because every waiting caller receives its own copy
/// of the shared outcome via a broadcast channel.
pub struct Coalescer<K, V> {
    inflight: Mutex<HashMap<K, Arc<InFlight<V>>>>,
}

impl<K, V> Default for Coalescer<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> Coalescer<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `thunk` for `key`, or joins an already-running call for the
    /// same key. `Err` carries the stringified failure of whichever call
    /// actually ran; every joiner observes the same `Ok`/`Err`.
    pub async fn run<F, Fut, E>(&self, key: K, thunk: F) -> Result<V, String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: std::fmt::Display,
    {
        // Fast path: join an in-flight computation.
        let mut receiver = {
            let mut inflight = self.inflight.lock().await;
            if let Some(existing) = inflight.get(&key) {
                existing.sender.subscribe()
            } else {
                let (sender, receiver) = broadcast::channel(1);
                inflight.insert(key.clone(), Arc::new(InFlight { sender }));
                drop(inflight);
                return self.drive(key, thunk).await;
            }
        };

        match receiver.recv().await {
            Ok(result) => result.map_err(|e| (*e).clone()),
            // The driving caller's sender was dropped without sending,
            // which only happens if it panicked; treat as a fresh failure
            // so a subsequent call can retry.
            Err(_) => Err("coalesced computation was dropped before completing".to_string()),
        }
    }

    async fn drive<F, Fut, E>(&self, key: K, thunk: F) -> Result<V, String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: std::fmt::Display,
    {
        let result = thunk().await;

        let mut inflight = self.inflight.lock().await;
        if let Some(entry) = inflight.remove(&key) {
            let broadcastable = result
                .as_ref()
                .map(|v| v.clone())
                .map_err(|e| Arc::new(e.to_string()));
            // No receivers is not an error; it just means no one joined.
            let _ = entry.sender.send(broadcastable);
        }
        drop(inflight);

        result.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_calls_with_same_key_run_thunk_once() {
        let coalescer: Arc<Coalescer<String, u32>> = Arc::new(Coalescer::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let coalescer = coalescer.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                coalescer
                    .run("example.com".to_string(), || {
                        let calls = calls.clone();
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok::<u32, String>(42)
                        }
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_not_cached_and_a_fresh_call_retries() {
        let coalescer: Coalescer<String, u32> = Coalescer::new();
        let calls = AtomicUsize::new(0);

        let first = coalescer
            .run("example.com".to_string(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, String>("boom".to_string())
            })
            .await;
        assert!(first.is_err());

        let second = coalescer
            .run("example.com".to_string(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, String>(7)
            })
            .await;
        assert_eq!(second.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn settled_entry_is_removed_so_later_calls_start_fresh() {
        let coalescer: Coalescer<String, u32> = Coalescer::new();
        let calls = AtomicUsize::new(0);

        for expected in 1..=3u32 {
            let result = coalescer
                .run("example.com".to_string(), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Ok::<u32, String>(expected) }
                })
                .await
                .unwrap();
            assert_eq!(result, expected);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
