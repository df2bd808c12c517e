use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hash, Hasher},
    sync::{LazyLock, RwLock}
};

use crate::{
    dialect::Options,
    signature::{Signature, signature}
};

/// Global signature cache
static SIGNATURE_CACHE: LazyLock<RwLock<SignatureCache>> =
    LazyLock::new(|| RwLock::new(SignatureCache::new(4096)));

/// Bounded cache of computed signatures keyed by input and options
pub struct SignatureCache {
    cache:    HashMap<u64, Signature>,
    max_size: usize
}

impl SignatureCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::with_capacity(max_size),
            max_size
        }
    }

    fn hash_key(sql: &str, options: &Options) -> u64 {
        let mut hasher = DefaultHasher::new();
        sql.hash(&mut hasher);
        options.hash(&mut hasher);
        hasher.finish()
    }

    pub fn get(&self, sql: &str, options: &Options) -> Option<Signature> {
        let key = Self::hash_key(sql, options);
        self.cache.get(&key).cloned()
    }

    pub fn insert(&mut self, sql: &str, options: &Options, sig: Signature) {
        // Clear half when full
        if self.cache.len() >= self.max_size {
            let keys: Vec<_> = self
                .cache
                .keys()
                .take(self.max_size.div_ceil(2))
                .copied()
                .collect();
            for key in keys {
                self.cache.remove(&key);
            }
        }

        let key = Self::hash_key(sql, options);
        self.cache.insert(key, sig);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Get a cached signature or None
pub fn get_cached(sql: &str, options: &Options) -> Option<Signature> {
    SIGNATURE_CACHE.read().ok()?.get(sql, options)
}

/// Cache a computed signature
pub fn cache_signature(sql: &str, options: &Options, sig: Signature) {
    if let Ok(mut cache) = SIGNATURE_CACHE.write() {
        cache.insert(sql, options, sig);
    }
}

/// Signature of `sql`, served from the global cache when present
pub fn signature_cached(sql: &str, options: &Options) -> Signature {
    if let Some(sig) = get_cached(sql, options) {
        return sig;
    }
    let sig = signature(sql, options);
    cache_signature(sql, options, sig.clone());
    sig
}
