use lru::LruCache;
use rustc_hash::FxBuildHasher;
use sluice_dns_application::ports::MappingStore;
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Bounded address -> hostname cache with per-entry expiry.
///
/// IPv4-mapped IPv6 keys are folded onto their IPv4 form.
pub struct LruMappingCache {
    inner: Mutex<LruCache<IpAddr, (String, Instant), FxBuildHasher>>,
}

impl LruMappingCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MappingStore for LruMappingCache {
    fn set_with_expiry(&self, ip: IpAddr, host: &str, expires_at: Instant) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(ip.to_canonical(), (host.to_string(), expires_at));
    }

    fn get(&self, ip: IpAddr) -> Option<String> {
        let ip = ip.to_canonical();
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match cache.get(&ip) {
            Some((host, expires_at)) if *expires_at > Instant::now() => Some(host.clone()),
            Some(_) => {
                cache.pop(&ip);
                None
            }
            None => None,
        }
    }
}
