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

use crate::storage::backend::{BackendStats, MetricsBackend};
use kiln_core::telemetry::metrics::MetricType;
use kiln_core::telemetry::{Metric, MetricId, MetricsError, MetricsResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory metrics backend using RwLock<HashMap>
///
/// This implementation provides:
/// - Thread-safe concurrent access (multiple readers, single writer)
/// - O(1) average case lookup and insertion
/// - Group insertion under a single write lock
#[derive(Debug)]
pub struct InMemoryBackend {
    /// The core storage - RwLock allows concurrent reads
    storage: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// Create a new in-memory backend
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new in-memory backend with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Get statistics about this backend
    pub fn get_stats(&self) -> BackendStats {
        let storage = self.storage.read().unwrap();

        let mut constant_count = 0;
        let mut gauge_count = 0;

        for metric in storage.values() {
            match metric.value.metric_type() {
                MetricType::Constant => constant_count += 1,
                MetricType::Gauge => gauge_count += 1,
            }
        }

        BackendStats {
            total_metrics: storage.len(),
            constant_count,
            gauge_count,
        }
    }

    // Registered constants are set once; replacing one with a different
    // value is rejected. Same-value re-puts stay idempotent.
    fn check_constant_overwrite(
        storage: &HashMap<MetricId, Metric>,
        incoming: &Metric,
    ) -> MetricsResult<()> {
        if let Some(existing) = storage.get(&incoming.metadata.id) {
            if let Some(current) = existing.value.as_constant() {
                if incoming.value.as_constant() != Some(current) {
                    return Err(MetricsError::InvalidOperation(format!(
                        "Constant metric {} cannot be replaced",
                        incoming.metadata.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Get metrics by namespace
    pub fn get_metrics_by_namespace(&self, namespace: &str) -> Vec<Metric> {
        let storage = self.storage.read().unwrap();
        storage
            .values()
            .filter(|metric| metric.metadata.id.namespace == namespace)
            .cloned()
            .collect()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsBackend for InMemoryBackend {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn put_metric(&self, metric: Metric) -> MetricsResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;

        Self::check_constant_overwrite(&storage, &metric)?;
        storage.insert(metric.metadata.id.clone(), metric);
        Ok(())
    }

    // One write lock for the whole group, so a counter publisher's metrics
    // appear together or not at all. The group is validated before the first
    // insert for the same reason.
    fn put_metrics(&self, metrics: Vec<Metric>) -> MetricsResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;

        for metric in &metrics {
            Self::check_constant_overwrite(&storage, metric)?;
        }
        for metric in metrics {
            storage.insert(metric.metadata.id.clone(), metric);
        }

        Ok(())
    }

    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self
            .storage
            .read()
            .map_err(|_| MetricsError::StorageError("Failed to acquire read lock".to_string()))?;

        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    fn contains_metric(&self, id: &MetricId) -> bool {
        if let Ok(storage) = self.storage.read() {
            storage.contains_key(id)
        } else {
            false
        }
    }

    fn list_all_metrics(&self) -> Vec<Metric> {
        if let Ok(storage) = self.storage.read() {
            storage.values().cloned().collect()
        } else {
            Vec::new()
        }
    }

    fn clear_all(&self) -> MetricsResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;

        storage.clear();
        Ok(())
    }

    fn metric_count(&self) -> usize {
        if let Ok(storage) = self.storage.read() {
            storage.len()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::telemetry::metrics::{Metric, MetricId};

    #[test]
    fn test_in_memory_backend_basic_operations() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("kiln.gc.metaspace", "capacity");
        let metric = Metric::new_gauge(id.clone(), "Current capacity", "bytes", 1500);

        assert!(backend.put_metric(metric).is_ok());
        assert!(backend.contains_metric(&id));

        let retrieved = backend.get_metric(&id).unwrap();
        assert_eq!(retrieved.value.as_gauge(), Some(1500));
        assert_eq!(backend.metric_count(), 1);
    }

    #[test]
    fn test_gauge_set_overwrites_value() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("kiln.gc.metaspace", "used");
        backend
            .put_metric(Metric::new_gauge(id.clone(), "Used bytes", "bytes", 900))
            .unwrap();

        backend.set_gauge(&id, 950).unwrap();
        assert_eq!(backend.get_metric(&id).unwrap().value.as_gauge(), Some(950));

        // Gauges may legitimately shrink between samples.
        backend.set_gauge(&id, 100).unwrap();
        assert_eq!(backend.get_metric(&id).unwrap().value.as_gauge(), Some(100));
    }

    #[test]
    fn test_constants_are_immutable() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("kiln.gc.metaspace", "minCapacity");
        backend
            .put_metric(Metric::new_constant(
                id.clone(),
                "Minimum chunk size",
                "bytes",
                64,
            ))
            .unwrap();

        let result = backend.set_gauge(&id, 128);
        assert!(matches!(
            result,
            Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: MetricType::Constant,
            })
        ));
        assert_eq!(
            backend.get_metric(&id).unwrap().value.as_constant(),
            Some(64)
        );
    }

    #[test]
    fn test_constants_cannot_be_replaced_by_reregistration() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("kiln.gc.metaspace", "minCapacity");
        backend
            .put_metric(Metric::new_constant(
                id.clone(),
                "Minimum chunk size",
                "bytes",
                64,
            ))
            .unwrap();

        // A different value is rejected through both put paths.
        let result = backend.put_metric(Metric::new_constant(
            id.clone(),
            "Minimum chunk size",
            "bytes",
            9999,
        ));
        assert!(matches!(result, Err(MetricsError::InvalidOperation(_))));

        let result = backend.put_metrics(vec![
            Metric::new_constant(id.clone(), "Minimum chunk size", "bytes", 9999),
            Metric::new_gauge(
                MetricId::new("kiln.gc.metaspace", "capacity"),
                "Current capacity",
                "bytes",
                1500,
            ),
        ]);
        assert!(matches!(result, Err(MetricsError::InvalidOperation(_))));

        // The offending group left nothing behind and the constant is intact.
        assert_eq!(backend.metric_count(), 1);
        assert_eq!(
            backend.get_metric(&id).unwrap().value.as_constant(),
            Some(64)
        );

        // A same-value re-put stays idempotent.
        backend
            .put_metric(Metric::new_constant(
                id.clone(),
                "Minimum chunk size",
                "bytes",
                64,
            ))
            .unwrap();
    }

    #[test]
    fn test_group_insert_and_namespace_filtering() {
        let backend = InMemoryBackend::new();

        let metrics = vec![
            Metric::new_constant(
                MetricId::new("kiln.gc.metaspace", "minCapacity"),
                "Minimum chunk size",
                "bytes",
                64,
            ),
            Metric::new_gauge(
                MetricId::new("kiln.gc.metaspace", "capacity"),
                "Current capacity",
                "bytes",
                1500,
            ),
            Metric::new_gauge(
                MetricId::new("kiln.gc.compressedclassspace", "capacity"),
                "Current capacity",
                "bytes",
                0,
            ),
        ];

        backend.put_metrics(metrics).unwrap();
        assert_eq!(backend.metric_count(), 3);

        let metaspace_metrics = backend.get_metrics_by_namespace("kiln.gc.metaspace");
        assert_eq!(metaspace_metrics.len(), 2);

        let class_metrics = backend.get_metrics_by_namespace("kiln.gc.compressedclassspace");
        assert_eq!(class_metrics.len(), 1);
    }

    #[test]
    fn test_backend_stats() {
        let backend = InMemoryBackend::new();

        backend
            .put_metric(Metric::new_constant(
                MetricId::new("test", "c1"),
                "Constant 1",
                "bytes",
                0,
            ))
            .unwrap();
        backend
            .put_metric(Metric::new_gauge(
                MetricId::new("test", "g1"),
                "Gauge 1",
                "bytes",
                0,
            ))
            .unwrap();
        backend
            .put_metric(Metric::new_gauge(
                MetricId::new("test", "g2"),
                "Gauge 2",
                "bytes",
                0,
            ))
            .unwrap();

        let stats = backend.get_stats();
        assert_eq!(stats.total_metrics, 3);
        assert_eq!(stats.constant_count, 1);
        assert_eq!(stats.gauge_count, 2);
    }

    #[test]
    fn test_not_found_errors() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("test", "nonexistent");

        let result = backend.get_metric(&id);
        assert!(result.is_err());
        if let Err(MetricsError::MetricNotFound(missing_id)) = result {
            assert_eq!(missing_id, id);
        }
    }
}
