// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The statistics contract between the metaspace allocator and telemetry.
//!
//! The allocator groups chunks into pools by purpose; the telemetry layer
//! samples aggregate byte counts either for one pool or summed across all of
//! them. Reads use `Ordering::Relaxed` against live allocation activity, so
//! a sample taken concurrently with an allocation may be torn across fields.
//! That is accepted: the counters feed best-effort operational telemetry,
//! not a consistency-sensitive consumer.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// The purpose a chunk pool serves within the metaspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkPoolKind {
    /// The default pool backing general runtime metadata.
    NonClass,
    /// The pool backing class metadata when compressed class pointers are
    /// enabled; it lives in its own reserved range.
    Class,
}

/// The scope of an aggregate statistics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsScope {
    /// Sum the statistic across every chunk pool.
    AllPools,
    /// Restrict the statistic to a single designated pool.
    Pool(ChunkPoolKind),
}

/// Read-only access to the metaspace allocator's aggregate counters.
///
/// Implementors only report already-computed aggregates; no accessor takes an
/// allocator lock, blocks, or fails.
pub trait MetaspaceStatsProvider: Send + Sync + Debug {
    /// Bytes in chunks currently handed out to metaspaces, in scope.
    fn allocated_capacity_bytes(&self, scope: StatsScope) -> u64;

    /// Unused bytes at the tails of allocated chunks, in scope.
    fn free_bytes(&self, scope: StatsScope) -> u64;

    /// Bytes parked on the chunk free lists, in scope. These convert back
    /// into allocated chunks without reserving new memory.
    fn free_chunks_total_bytes(&self, scope: StatsScope) -> u64;

    /// Total reserved address-space bytes, in scope.
    fn reserved_bytes(&self, scope: StatsScope) -> u64;

    /// Bytes occupied by live metadata, in scope.
    fn allocated_used_bytes(&self, scope: StatsScope) -> u64;

    /// The allocator's minimum chunk granularity in bytes.
    fn min_chunk_size(&self) -> u64;
}

/// One chunk pool's aggregate counters.
///
/// The allocator stores into these cells as chunks move between states; any
/// reader may load them at any time. All counts are bytes.
#[derive(Debug, Default)]
pub struct PoolCounters {
    /// Bytes in chunks currently handed out to metaspaces.
    pub allocated_capacity_bytes: AtomicU64,
    /// Unused bytes at the tails of those chunks.
    pub free_bytes: AtomicU64,
    /// Bytes parked on the chunk free lists.
    pub free_chunks_total_bytes: AtomicU64,
    /// Total reserved address-space bytes for the pool's range.
    pub reserved_bytes: AtomicU64,
    /// Bytes occupied by live metadata.
    pub allocated_used_bytes: AtomicU64,
}

impl PoolCounters {
    /// Creates a pool with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

/// The in-tree [`MetaspaceStatsProvider`]: one [`PoolCounters`] per pool,
/// published by the allocator and sampled by telemetry.
#[derive(Debug)]
pub struct SharedMetaspaceStats {
    non_class: PoolCounters,
    class: PoolCounters,
    min_chunk_size: u64,
}

impl SharedMetaspaceStats {
    /// Creates zeroed statistics with the given minimum chunk granularity.
    pub fn new(min_chunk_size: u64) -> Self {
        Self {
            non_class: PoolCounters::new(),
            class: PoolCounters::new(),
            min_chunk_size,
        }
    }

    /// Returns the counter cells for one pool, for the allocator to update.
    pub fn pool(&self, kind: ChunkPoolKind) -> &PoolCounters {
        match kind {
            ChunkPoolKind::NonClass => &self.non_class,
            ChunkPoolKind::Class => &self.class,
        }
    }

    fn read(&self, scope: StatsScope, field: impl Fn(&PoolCounters) -> &AtomicU64) -> u64 {
        match scope {
            StatsScope::AllPools => field(&self.non_class).load(Ordering::Relaxed)
                + field(&self.class).load(Ordering::Relaxed),
            StatsScope::Pool(kind) => field(self.pool(kind)).load(Ordering::Relaxed),
        }
    }
}

impl MetaspaceStatsProvider for SharedMetaspaceStats {
    fn allocated_capacity_bytes(&self, scope: StatsScope) -> u64 {
        self.read(scope, |p| &p.allocated_capacity_bytes)
    }

    fn free_bytes(&self, scope: StatsScope) -> u64 {
        self.read(scope, |p| &p.free_bytes)
    }

    fn free_chunks_total_bytes(&self, scope: StatsScope) -> u64 {
        self.read(scope, |p| &p.free_chunks_total_bytes)
    }

    fn reserved_bytes(&self, scope: StatsScope) -> u64 {
        self.read(scope, |p| &p.reserved_bytes)
    }

    fn allocated_used_bytes(&self, scope: StatsScope) -> u64 {
        self.read(scope, |p| &p.allocated_used_bytes)
    }

    fn min_chunk_size(&self) -> u64 {
        self.min_chunk_size
    }
}
