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

//! Publisher for one metadata region's four performance metrics.

use crate::metrics::registry::{GaugeHandle, MetricsRegistry, UNIT_BYTES};
use kiln_core::telemetry::{Metric, MetricId, MetricsResult};

/// The fixed top-level category every metaspace metric is published under.
pub const PERF_NAMESPACE_ROOT: &str = "kiln.gc";

/// Name of the constant holding the region's minimum chunk granularity.
pub const MIN_CAPACITY: &str = "minCapacity";
/// Name of the gauge holding the region's current capacity.
pub const CAPACITY: &str = "capacity";
/// Name of the gauge holding the region's reserved address-space size.
pub const MAX_CAPACITY: &str = "maxCapacity";
/// Name of the gauge holding the bytes occupied by live metadata.
pub const USED: &str = "used";

/// Owns the four metric slots for one region namespace: the `minCapacity`
/// constant and the `capacity`, `maxCapacity` and `used` gauges.
///
/// The four metrics are registered as one group at construction; a failed
/// registration propagates and leaves no publisher behind. The metrics stay
/// registered for the rest of the process, so late-attaching monitoring
/// tools always find them.
#[derive(Debug)]
pub struct MetaspacePerfPublisher {
    namespace: String,
    capacity: GaugeHandle,
    max_capacity: GaugeHandle,
    used: GaugeHandle,
}

impl MetaspacePerfPublisher {
    /// Registers the metric group for `namespace` (qualified under
    /// [`PERF_NAMESPACE_ROOT`]), seeded with the given byte counts.
    pub fn new(
        registry: &MetricsRegistry,
        namespace: &str,
        min_capacity: u64,
        capacity: u64,
        max_capacity: u64,
        used: u64,
    ) -> MetricsResult<Self> {
        let namespace = format!("{PERF_NAMESPACE_ROOT}.{namespace}");
        let capacity_id = MetricId::new(namespace.clone(), CAPACITY);
        let max_capacity_id = MetricId::new(namespace.clone(), MAX_CAPACITY);
        let used_id = MetricId::new(namespace.clone(), USED);

        registry.register_metrics(vec![
            Metric::new_constant(
                MetricId::new(namespace.clone(), MIN_CAPACITY),
                "Minimum chunk granularity of the region",
                UNIT_BYTES,
                min_capacity,
            ),
            Metric::new_gauge(
                capacity_id.clone(),
                "Reserved-and-committed working set of the region",
                UNIT_BYTES,
                capacity,
            ),
            Metric::new_gauge(
                max_capacity_id.clone(),
                "Total reserved address-space size of the region",
                UNIT_BYTES,
                max_capacity,
            ),
            Metric::new_gauge(
                used_id.clone(),
                "Bytes occupied by live metadata",
                UNIT_BYTES,
                used,
            ),
        ])?;

        log::info!("Registered performance counters under {namespace}");

        Ok(Self {
            capacity: registry.gauge(&capacity_id)?,
            max_capacity: registry.gauge(&max_capacity_id)?,
            used: registry.gauge(&used_id)?,
            namespace,
        })
    }

    /// Overwrites the three gauges with a fresh sample. No monotonicity or
    /// bounds validation; the three writes are not mutually atomic, so a
    /// concurrent reader may observe a half-applied snapshot.
    pub fn update(&self, capacity: u64, max_capacity: u64, used: u64) -> MetricsResult<()> {
        self.capacity.set(capacity)?;
        self.max_capacity.set(max_capacity)?;
        self.used.set(used)?;
        Ok(())
    }

    /// The fully qualified namespace the metrics live under.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Current value of the `capacity` gauge.
    pub fn capacity(&self) -> MetricsResult<u64> {
        self.capacity.get()
    }

    /// Current value of the `maxCapacity` gauge.
    pub fn max_capacity(&self) -> MetricsResult<u64> {
        self.max_capacity.get()
    }

    /// Current value of the `used` gauge.
    pub fn used(&self) -> MetricsResult<u64> {
        self.used.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::MetricsBackend;
    use kiln_core::telemetry::{MetricId, MetricsError};
    use std::sync::Arc;

    // Backend with no storage behind it: every write fails.
    #[derive(Debug)]
    struct FailingBackend;

    impl MetricsBackend for FailingBackend {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn put_metric(&self, _metric: Metric) -> MetricsResult<()> {
            Err(MetricsError::StorageError(
                "No metric storage available".to_string(),
            ))
        }

        fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
            Err(MetricsError::MetricNotFound(id.clone()))
        }

        fn contains_metric(&self, _id: &MetricId) -> bool {
            false
        }

        fn list_all_metrics(&self) -> Vec<Metric> {
            Vec::new()
        }

        fn clear_all(&self) -> MetricsResult<()> {
            Ok(())
        }

        fn metric_count(&self) -> usize {
            0
        }
    }

    fn constant_value(registry: &MetricsRegistry, namespace: &str, name: &str) -> u64 {
        let id = MetricId::new(namespace, name);
        registry
            .get_metric(&id)
            .unwrap()
            .value
            .as_constant()
            .unwrap()
    }

    #[test]
    fn test_construction_registers_all_four_metrics() {
        let registry = MetricsRegistry::new();
        let publisher =
            MetaspacePerfPublisher::new(&registry, "metaspace", 64, 1500, 4096, 900).unwrap();

        assert_eq!(publisher.namespace(), "kiln.gc.metaspace");
        assert_eq!(registry.metric_count(), 4);
        assert_eq!(
            constant_value(&registry, "kiln.gc.metaspace", MIN_CAPACITY),
            64
        );
        assert_eq!(publisher.capacity().unwrap(), 1500);
        assert_eq!(publisher.max_capacity().unwrap(), 4096);
        assert_eq!(publisher.used().unwrap(), 900);
    }

    #[test]
    fn test_update_overwrites_gauges_and_leaves_constant() {
        let registry = MetricsRegistry::new();
        let publisher =
            MetaspacePerfPublisher::new(&registry, "metaspace", 64, 1500, 4096, 900).unwrap();

        publisher.update(1600, 4096, 950).unwrap();

        assert_eq!(publisher.capacity().unwrap(), 1600);
        assert_eq!(publisher.max_capacity().unwrap(), 4096);
        assert_eq!(publisher.used().unwrap(), 950);
        assert_eq!(
            constant_value(&registry, "kiln.gc.metaspace", MIN_CAPACITY),
            64
        );
    }

    #[test]
    fn test_gauges_may_shrink_between_samples() {
        let registry = MetricsRegistry::new();
        let publisher =
            MetaspacePerfPublisher::new(&registry, "metaspace", 64, 1500, 4096, 900).unwrap();

        publisher.update(700, 4096, 300).unwrap();

        assert_eq!(publisher.capacity().unwrap(), 700);
        assert_eq!(publisher.used().unwrap(), 300);
    }

    #[test]
    fn test_failed_registration_constructs_no_publisher() {
        let registry = MetricsRegistry::with_backend(Arc::new(FailingBackend));

        let result = MetaspacePerfPublisher::new(&registry, "metaspace", 64, 1500, 4096, 900);

        assert!(matches!(result, Err(MetricsError::StorageError(_))));
        assert_eq!(registry.metric_count(), 0);
    }

    #[test]
    fn test_distinct_namespaces_do_not_collide() {
        let registry = MetricsRegistry::new();
        let metaspace =
            MetaspacePerfPublisher::new(&registry, "metaspace", 64, 1500, 4096, 900).unwrap();
        let class_space =
            MetaspacePerfPublisher::new(&registry, "compressedclassspace", 0, 0, 0, 0).unwrap();

        metaspace.update(1600, 4096, 950).unwrap();

        assert_eq!(class_space.capacity().unwrap(), 0);
        assert_eq!(class_space.used().unwrap(), 0);
        assert_eq!(registry.metric_count(), 8);
    }
}
