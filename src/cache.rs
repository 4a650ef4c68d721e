//! Thin adapter over a caller-supplied cache (spec §4.2 `CacheFacade`).
//!
//! Both synchronous and asynchronous cache shapes are accepted uniformly —
//! in Rust that collapses to one `async_trait`, since a synchronous map can
//! always be wrapped to satisfy it trivially. Write-through ordering is
//! guaranteed: the value returned equals the value just written.

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

/// The cache contract both `apexResultCache` and `fqdnResultCache` satisfy
/// (spec §3 Caches, §4.2). Implementations must not delete entries of
/// their own accord beyond whatever eviction policy the caller configured —
/// the engine treats entries as write-once for the lifetime of one
/// checker instance.
#[async_trait]
pub trait ResultCache<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    async fn has(&self, key: &str) -> bool;
    async fn get(&self, key: &str) -> Option<V>;
    async fn set(&self, key: &str, value: V);
}

/// The default in-memory cache instantiated when a checker factory is not
/// given one (spec §9 "Default cache"), backed by `moka` exactly as the
/// teacher's `cache.rs` backs `WhoisResponse` caching.
pub struct InMemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    cache: MokaCache<String, V>,
}

impl<V> InMemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(max_capacity: u64) -> Self {
        Self {
            cache: MokaCache::builder().max_capacity(max_capacity).build(),
        }
    }
}

impl<V> Default for InMemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl<V> ResultCache<V> for InMemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn has(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    async fn get(&self, key: &str) -> Option<V> {
        self.cache.get(key).await
    }

    async fn set(&self, key: &str, value: V) {
        self.cache.insert(key.to_string(), value).await;
    }
}

/// `getOrCompute(cache, key, thunk)` (spec §4.2). When `cache` is `None`,
/// simply evaluates `thunk`. `has` is authoritative: a cache reporting a
/// hit is trusted even if `get` would otherwise read as empty/absent.
pub async fn get_or_compute<V, F, Fut>(
    cache: Option<&(dyn ResultCache<V> + '_)>,
    key: &str,
    thunk: F,
) -> V
where
    V: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = V>,
{
    let Some(cache) = cache else {
        return thunk().await;
    };

    if cache.has(key).await {
        if let Some(value) = cache.get(key).await {
            return value;
        }
    }

    let value = thunk().await;
    cache.set(key, value.clone()).await;
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn absent_cache_always_computes() {
        let calls = AtomicUsize::new(0);
        let value = get_or_compute::<u32, _, _>(None, "k", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { 5 }
        })
        .await;
        assert_eq!(value, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let cache: InMemoryCache<u32> = InMemoryCache::default();
        let calls = AtomicUsize::new(0);

        let first = get_or_compute(Some(&cache as &dyn ResultCache<u32>), "k", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { 9 }
        })
        .await;
        let second = get_or_compute(Some(&cache as &dyn ResultCache<u32>), "k", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { 100 }
        })
        .await;

        assert_eq!(first, 9);
        assert_eq!(second, 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
