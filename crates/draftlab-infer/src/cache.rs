use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

const SHARD_COUNT: usize = 16;

/// A sharded, TTL-expiring result cache (spec.md §4.8 "Caching", §5 "the
/// per-process cache ... is the only mutable shared structure on the
/// serving path"). Grounded in the teacher's `Arc<Client>`-wrapped
/// shared-state idiom (`rbp-hosting::Casino`'s `RwLock<HashMap<...>>>`),
/// generalized from "one lock guarding one map" to "N locks each guarding
/// a shard," since a single global lock would serialize every concurrent
/// request through one mutex.
pub struct ResultCache<V: Clone> {
    shards: Vec<Mutex<HashMap<u64, (V, Instant)>>>,
    ttl: Duration,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    fn shard_for(&self, key: u64) -> &Mutex<HashMap<u64, (V, Instant)>> {
        &self.shards[(key as usize) % self.shards.len()]
    }

    /// A cache miss never changes the prediction (spec.md §4.8): the
    /// caller always has a fallback compute path, this only ever returns
    /// `Some` when a fresh entry exists.
    pub fn get(&self, key: u64) -> Option<V> {
        let shard = self.shard_for(key).lock().unwrap();
        let (value, inserted_at) = shard.get(&key)?;
        if inserted_at.elapsed() > self.ttl {
            return None;
        }
        Some(value.clone())
    }

    pub fn put(&self, key: u64, value: V) {
        let mut shard = self.shard_for(key).lock().unwrap();
        shard.insert(key, (value, Instant::now()));
    }
}

/// Stable hash of the canonical draft context: tier_group, patch,
/// picks-by-role, sorted bans (spec.md §4.8 "Caching"). Two requests for
/// the same draft under the same model context always collide.
pub fn canonical_key(
    tier_group_str: &str,
    patch_str: &str,
    blue_picks: &[i64; 5],
    red_picks: &[i64; 5],
    blue_bans: &[i64; 5],
    red_bans: &[i64; 5],
    extra: &[&str],
) -> u64 {
    let mut hasher = DefaultHasher::new();
    tier_group_str.hash(&mut hasher);
    patch_str.hash(&mut hasher);
    blue_picks.hash(&mut hasher);
    red_picks.hash(&mut hasher);
    let mut sorted_blue_bans = *blue_bans;
    let mut sorted_red_bans = *red_bans;
    sorted_blue_bans.sort_unstable();
    sorted_red_bans.sort_unstable();
    sorted_blue_bans.hash(&mut hasher);
    sorted_red_bans.hash(&mut hasher);
    for e in extra {
        e.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_unseen_key_returns_none() {
        let cache: ResultCache<u32> = ResultCache::new(60);
        assert!(cache.get(42).is_none());
    }

    #[test]
    fn put_then_get_round_trips_within_ttl() {
        let cache = ResultCache::new(60);
        cache.put(7, "value".to_string());
        assert_eq!(cache.get(7), Some("value".to_string()));
    }

    #[test]
    fn expired_entry_is_treated_as_a_miss() {
        let cache = ResultCache::new(0);
        cache.put(1, 99u32);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn canonical_key_is_order_sensitive_on_picks_but_not_on_ban_order() {
        let picks_a = [1, 2, 3, 4, 5];
        let picks_b = [6, 7, 8, 9, 10];
        let k1 = canonical_key("mid", "15.20", &picks_a, &picks_b, &[11, 12, -1, -1, -1], &[-1; 5], &[]);
        let k2 = canonical_key("mid", "15.20", &picks_a, &picks_b, &[12, 11, -1, -1, -1], &[-1; 5], &[]);
        assert_eq!(k1, k2, "ban order should not affect the cache key");

        let k3 = canonical_key("mid", "15.20", &picks_b, &picks_a, &[11, 12, -1, -1, -1], &[-1; 5], &[]);
        assert_ne!(k1, k3, "swapping picks between sides changes identity");
    }
}
