// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_signature::{
    cache::{SignatureCache, cache_signature, get_cached, signature_cached},
    dialect::{Dialect, Options},
    signature::signature
};

#[test]
fn test_signature_cache_new() {
    let cache = SignatureCache::new(100);
    assert!(cache.is_empty());
    assert!(cache.get("SELECT 1", &Options::default()).is_none());
}

#[test]
fn test_signature_cache_insert_and_get() {
    let mut cache = SignatureCache::new(100);
    let opts = Options::new(Dialect::Postgres);
    let sig = signature("SELECT id FROM users WHERE id = 1", &opts);
    cache.insert("SELECT id FROM users WHERE id = 1", &opts, sig.clone());

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("SELECT id FROM users WHERE id = 1", &opts), Some(sig));
}

#[test]
fn test_signature_cache_keyed_by_options() {
    let mut cache = SignatureCache::new(100);
    let plain = Options::new(Dialect::MySql);
    let collapsed = plain.collapse_values(true);
    let sql = "INSERT INTO t VALUES (1), (2)";
    cache.insert(sql, &plain, signature(sql, &plain));

    assert!(cache.get(sql, &plain).is_some());
    assert!(cache.get(sql, &collapsed).is_none());
    assert!(cache.get(sql, &Options::new(Dialect::Oracle)).is_none());
}

#[test]
fn test_signature_cache_eviction() {
    let mut cache = SignatureCache::new(4);
    let opts = Options::default();
    for i in 0..4 {
        let sql = format!("SELECT {}", i);
        cache.insert(&sql, &opts, signature(&sql, &opts));
    }
    assert_eq!(cache.len(), 4);

    cache.insert("SELECT 99", &opts, signature("SELECT 99", &opts));
    assert_eq!(cache.len(), 3);
    assert!(cache.get("SELECT 99", &opts).is_some());
}

#[test]
fn test_global_cache_roundtrip() {
    let opts = Options::new(Dialect::Oracle).paramize_time_funcs(true);
    let sql = "SELECT SYSDATE FROM dual WHERE id = 314159";
    let sig = signature(sql, &opts);
    cache_signature(sql, &opts, sig.clone());

    assert_eq!(get_cached(sql, &opts), Some(sig));
}

#[test]
fn test_signature_cached_matches_direct() {
    let opts = Options::new(Dialect::SqlServer);
    let sql = "UPDATE t SET a = N'x' WHERE id = 271828";

    let first = signature_cached(sql, &opts);
    let second = signature_cached(sql, &opts);
    assert_eq!(first, signature(sql, &opts));
    assert_eq!(first, second);
}
