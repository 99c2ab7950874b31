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

//! Service driving the metaspace performance counters.

use crate::counters::config::PerfCountersConfig;
use crate::counters::region::RegionCounters;
use crate::metrics::registry::MetricsRegistry;
use kiln_core::memory::metaspace::MetaspaceStatsProvider;
use kiln_core::telemetry::MetricsResult;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Owns the metrics registry and both region counters, and drives their
/// refresh on behalf of the embedder.
///
/// Construction initializes both regions from the current allocator state;
/// afterwards the embedder calls [`tick`](Self::tick) from its periodic
/// loop, or [`refresh`](Self::refresh) from event-driven points such as the
/// end of a collection cycle.
#[derive(Debug)]
pub struct MetaspaceCountersService {
    registry: MetricsRegistry,
    stats: Arc<dyn MetaspaceStatsProvider>,
    metaspace: RegionCounters,
    class_space: RegionCounters,
    last_update: Instant,
    update_interval: Duration,
}

impl MetaspaceCountersService {
    /// Creates the service and initializes both regions' counters.
    ///
    /// A registration failure aborts construction; the embedder then simply
    /// runs without performance counters.
    pub fn new(
        config: &PerfCountersConfig,
        stats: Arc<dyn MetaspaceStatsProvider>,
        update_interval: Duration,
    ) -> MetricsResult<Self> {
        let registry = MetricsRegistry::new();
        let mut metaspace = RegionCounters::metaspace(config);
        let mut class_space = RegionCounters::compressed_class_space(config);

        metaspace.initialize_performance_counters(&registry, stats.as_ref())?;
        class_space.initialize_performance_counters(&registry, stats.as_ref())?;

        Ok(Self {
            registry,
            stats,
            metaspace,
            class_space,
            last_update: Instant::now(),
            update_interval,
        })
    }

    /// Should be called periodically by the embedder. Refreshes both
    /// regions if the update interval has passed.
    pub fn tick(&mut self) -> bool {
        if self.last_update.elapsed() >= self.update_interval {
            self.refresh();
            true
        } else {
            false
        }
    }

    /// Refreshes both regions unconditionally and resets the interval.
    pub fn refresh(&mut self) {
        log::trace!("Refreshing metaspace performance counters...");
        self.metaspace.update_performance_counters(self.stats.as_ref());
        self.class_space
            .update_performance_counters(self.stats.as_ref());
        self.last_update = Instant::now();
    }

    /// Returns a reference to the metrics registry.
    pub fn metrics_registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    /// Returns the metaspace region's counters.
    pub fn metaspace(&self) -> &RegionCounters {
        &self.metaspace
    }

    /// Returns the compressed class space region's counters.
    pub fn class_space(&self) -> &RegionCounters {
        &self.class_space
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::memory::metaspace::{ChunkPoolKind, SharedMetaspaceStats};
    use kiln_core::telemetry::MetricId;
    use std::sync::atomic::Ordering;

    fn sample_stats() -> Arc<SharedMetaspaceStats> {
        let stats = SharedMetaspaceStats::new(64);
        let pool = stats.pool(ChunkPoolKind::NonClass);
        pool.allocated_capacity_bytes.store(1000, Ordering::Relaxed);
        pool.free_bytes.store(200, Ordering::Relaxed);
        pool.free_chunks_total_bytes.store(300, Ordering::Relaxed);
        pool.reserved_bytes.store(4096, Ordering::Relaxed);
        pool.allocated_used_bytes.store(900, Ordering::Relaxed);
        Arc::new(stats)
    }

    #[test]
    fn test_service_initializes_both_regions() {
        let service = MetaspaceCountersService::new(
            &PerfCountersConfig::with_perf_data(),
            sample_stats(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert!(service.metaspace().is_initialized());
        assert!(service.class_space().is_initialized());
        // Four metrics per region.
        assert_eq!(service.metrics_registry().metric_count(), 8);
    }

    #[test]
    fn test_disabled_service_registers_nothing() {
        let service = MetaspaceCountersService::new(
            &PerfCountersConfig::default(),
            sample_stats(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert!(!service.metaspace().is_initialized());
        assert_eq!(service.metrics_registry().metric_count(), 0);
    }

    #[test]
    fn test_tick_respects_interval_and_refresh_does_not() {
        let stats = sample_stats();
        let mut service = MetaspaceCountersService::new(
            &PerfCountersConfig::with_perf_data(),
            stats.clone(),
            Duration::from_secs(3600),
        )
        .unwrap();

        stats
            .pool(ChunkPoolKind::NonClass)
            .allocated_used_bytes
            .store(980, Ordering::Relaxed);

        // Interval has not elapsed.
        assert!(!service.tick());
        let used_id = MetricId::new("kiln.gc.metaspace", "used");
        assert_eq!(
            service
                .metrics_registry()
                .get_metric(&used_id)
                .unwrap()
                .value
                .as_u64(),
            900
        );

        service.refresh();
        assert_eq!(
            service
                .metrics_registry()
                .get_metric(&used_id)
                .unwrap()
                .value
                .as_u64(),
            980
        );
    }

    #[test]
    fn test_zero_interval_tick_refreshes() {
        let stats = sample_stats();
        let mut service = MetaspaceCountersService::new(
            &PerfCountersConfig::with_perf_data(),
            stats.clone(),
            Duration::ZERO,
        )
        .unwrap();

        stats
            .pool(ChunkPoolKind::NonClass)
            .allocated_capacity_bytes
            .store(1100, Ordering::Relaxed);

        assert!(service.tick());
        let capacity_id = MetricId::new("kiln.gc.metaspace", "capacity");
        assert_eq!(
            service
                .metrics_registry()
                .get_metric(&capacity_id)
                .unwrap()
                .value
                .as_u64(),
            1600
        );
    }
}
