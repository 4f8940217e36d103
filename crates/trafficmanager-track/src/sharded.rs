//! Key-partitioned map.
//!
//! Each shard is an independent `RwLock<HashMap>`, padded to its own cache
//! line. Operations on keys in different shards never contend, and no caller
//! ever needs a lock over the whole map.

use std::hash::Hash;

use ahash::{AHashMap, RandomState};
use crossbeam::utils::CachePadded;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) type Shard<K, V> = RwLock<AHashMap<K, V>>;

pub(crate) struct ShardedMap<K, V> {
    shards: Box<[CachePadded<Shard<K, V>>]>,
    selector: RandomState,
    mask: usize,
}

impl<K: Hash + Eq, V> ShardedMap<K, V> {
    /// `shard_count` must be a power of two.
    pub(crate) fn new(shard_count: usize) -> Self {
        debug_assert!(shard_count.is_power_of_two());
        let shards = (0..shard_count)
            .map(|_| CachePadded::new(RwLock::new(AHashMap::new())))
            .collect();
        Self {
            shards,
            selector: RandomState::new(),
            mask: shard_count - 1,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn shard_index(&self, key: &K) -> usize {
        (self.selector.hash_one(key) as usize) & self.mask
    }

    // `mask` is `len - 1`, so the masked index is always in bounds.
    #[allow(clippy::indexing_slicing)]
    pub(crate) fn shard_at(&self, index: usize) -> &Shard<K, V> {
        &self.shards[index & self.mask]
    }

    pub(crate) fn read(&self, key: &K) -> RwLockReadGuard<'_, AHashMap<K, V>> {
        self.shard_at(self.shard_index(key)).read()
    }

    pub(crate) fn write(&self, key: &K) -> RwLockWriteGuard<'_, AHashMap<K, V>> {
        self.shard_at(self.shard_index(key)).write()
    }

    pub(crate) fn shards(&self) -> impl Iterator<Item = &Shard<K, V>> {
        self.shards.iter().map(|shard| &**shard)
    }

    /// Entry count, summed shard by shard; exact only when writers are quiet.
    pub(crate) fn len(&self) -> usize {
        self.shards().map(|shard| shard.read().len()).sum()
    }

    pub(crate) fn clear(&self) {
        for shard in self.shards() {
            shard.write().clear();
        }
    }

    pub(crate) fn shard_count(&self) -> usize {
        self.shards.len()
    }
}
