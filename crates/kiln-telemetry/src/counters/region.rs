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

//! Per-region performance counter lifecycles.

use crate::counters::config::PerfCountersConfig;
use crate::counters::publisher::MetaspacePerfPublisher;
use crate::metrics::registry::MetricsRegistry;
use kiln_core::memory::metaspace::{ChunkPoolKind, MetaspaceStatsProvider, StatsScope};
use kiln_core::telemetry::MetricsResult;

/// Publishes one metadata region's occupancy and capacity counters.
///
/// The same component serves both regions; what differs is the namespace,
/// the statistics scope, and whether the region is live. The embedder calls
/// [`initialize_performance_counters`](Self::initialize_performance_counters)
/// exactly once from its startup path and
/// [`update_performance_counters`](Self::update_performance_counters) from
/// its refresh points. Calling them out of order is a caller contract
/// violation and panics; it is never recovered.
#[derive(Debug)]
pub struct RegionCounters {
    namespace: &'static str,
    scope: StatsScope,
    enabled: bool,
    live: bool,
    publisher: Option<MetaspacePerfPublisher>,
}

impl RegionCounters {
    /// Counters for the metaspace proper, aggregated across all chunk pools.
    pub fn metaspace(config: &PerfCountersConfig) -> Self {
        Self {
            namespace: "metaspace",
            scope: StatsScope::AllPools,
            enabled: config.enabled,
            live: true,
            publisher: None,
        }
    }

    /// Counters for the compressed class space, scoped to the class pool.
    ///
    /// When compressed class pointers are off the region still registers its
    /// metrics so consumers see a stable schema, but every value is zero and
    /// stays zero.
    pub fn compressed_class_space(config: &PerfCountersConfig) -> Self {
        Self {
            namespace: "compressedclassspace",
            scope: StatsScope::Pool(ChunkPoolKind::Class),
            enabled: config.enabled,
            live: config.compressed_class_pointers,
            publisher: None,
        }
    }

    /// Computes the region's current capacity from live allocator state.
    ///
    /// The capacity is the sum of
    ///   1) bytes in chunks currently handed out to metaspaces,
    ///   2) unused space at the tail of each of those chunks,
    ///   3) bytes parked on the chunk free lists.
    /// The sum always equals the region's reserved-and-committed working
    /// set, however it is partitioned between the three forms.
    pub fn calculate_capacity(&self, stats: &dyn MetaspaceStatsProvider) -> u64 {
        stats.allocated_capacity_bytes(self.scope)
            + stats.free_bytes(self.scope)
            + stats.free_chunks_total_bytes(self.scope)
    }

    /// Registers the region's metrics, seeded from the current allocator
    /// state.
    ///
    /// A silent no-op when performance data is disabled. A registration
    /// failure propagates and leaves the region without working counters;
    /// nothing reports that state further.
    ///
    /// # Panics
    ///
    /// Panics if the region was already initialized.
    pub fn initialize_performance_counters(
        &mut self,
        registry: &MetricsRegistry,
        stats: &dyn MetaspaceStatsProvider,
    ) -> MetricsResult<()> {
        if !self.enabled {
            return Ok(());
        }
        assert!(
            self.publisher.is_none(),
            "{} performance counters already initialized",
            self.namespace
        );

        let publisher = if self.live {
            let min_capacity = stats.min_chunk_size();
            let capacity = self.calculate_capacity(stats);
            let max_capacity = stats.reserved_bytes(self.scope);
            let used = stats.allocated_used_bytes(self.scope);

            MetaspacePerfPublisher::new(
                registry,
                self.namespace,
                min_capacity,
                capacity,
                max_capacity,
                used,
            )?
        } else {
            MetaspacePerfPublisher::new(registry, self.namespace, 0, 0, 0, 0)?
        };

        self.publisher = Some(publisher);
        Ok(())
    }

    /// Recomputes the three dynamic values and pushes them.
    ///
    /// A silent no-op when performance data is disabled, and for a region
    /// that is not live (its zero placeholder values persist; the
    /// initialization precondition is not checked for such a region). A
    /// publish failure is logged and swallowed; the counters are
    /// best-effort telemetry.
    ///
    /// # Panics
    ///
    /// Panics if a live region is updated before initialization.
    pub fn update_performance_counters(&self, stats: &dyn MetaspaceStatsProvider) {
        if !self.enabled || !self.live {
            return;
        }
        let Some(publisher) = self.publisher.as_ref() else {
            panic!(
                "{} performance counters updated before initialization",
                self.namespace
            );
        };

        let capacity = self.calculate_capacity(stats);
        let max_capacity = stats.reserved_bytes(self.scope);
        let used = stats.allocated_used_bytes(self.scope);

        if let Err(err) = publisher.update(capacity, max_capacity, used) {
            log::warn!("Failed to publish {} counters: {err}", self.namespace);
        }
    }

    /// Whether `initialize_performance_counters` has run and registered
    /// metrics.
    pub fn is_initialized(&self) -> bool {
        self.publisher.is_some()
    }

    /// The region's namespace segment (e.g., "metaspace").
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// The statistics scope the region samples.
    pub fn scope(&self) -> StatsScope {
        self.scope
    }

    /// Read-only access to the region's publisher, exposed for
    /// introspection and debugging consumers.
    pub fn publisher(&self) -> Option<&MetaspacePerfPublisher> {
        self.publisher.as_ref()
    }
}
