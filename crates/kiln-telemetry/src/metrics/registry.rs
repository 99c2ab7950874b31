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

//! Registry for managing metrics.

use crate::storage::{backend::MetricsBackend, memory_backend::InMemoryBackend};
use kiln_core::telemetry::metrics::{
    Metric, MetricId, MetricSnapshot, MetricType, MetricsError, MetricsResult,
};
use std::sync::Arc;

/// The unit tag attached to every metric in this system.
pub const UNIT_BYTES: &str = "bytes";

/// Central registry for the runtime's performance metrics.
///
/// The registry provides a high-level API for metric registration, updates,
/// and queries on top of a pluggable storage backend. Counter publishers use
/// it to create their metric slots; monitoring consumers read it through the
/// query and snapshot surface.
#[derive(Debug)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// Create a new metrics registry with the default in-memory backend
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
        }
    }

    /// Create a new metrics registry with a custom backend
    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Register a new constant metric, set once and never updated.
    pub fn register_constant(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        value: u64,
    ) -> MetricsResult<()> {
        let id = MetricId::new(namespace, name);
        let metric = Metric::new_constant(id, description, UNIT_BYTES, value);
        self.backend.put_metric(metric)
    }

    /// Register a new gauge metric
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        initial_value: u64,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        let metric = Metric::new_gauge(id.clone(), description, UNIT_BYTES, initial_value);
        self.backend.put_metric(metric)?;
        Ok(GaugeHandle::new(id, self.backend.clone()))
    }

    /// Register a group of metrics in one backend operation, so that either
    /// the whole group becomes visible or none of it does.
    pub fn register_metrics(&self, metrics: Vec<Metric>) -> MetricsResult<()> {
        self.backend.put_metrics(metrics)
    }

    /// Get a handle over an already registered gauge.
    pub fn gauge(&self, id: &MetricId) -> MetricsResult<GaugeHandle> {
        let metric = self.backend.get_metric(id)?;
        match metric.metadata.metric_type {
            MetricType::Gauge => Ok(GaugeHandle::new(id.clone(), self.backend.clone())),
            found => Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found,
            }),
        }
    }

    /// Get a metric by ID
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.backend.get_metric(id)
    }

    /// Check if a metric exists
    pub fn contains_metric(&self, id: &MetricId) -> bool {
        self.backend.contains_metric(id)
    }

    /// Get all metrics in a namespace
    pub fn get_namespace_metrics(&self, namespace: &str) -> Vec<Metric> {
        // Try to cast to InMemoryBackend for more efficient operation
        if let Some(memory_backend) = self
            .backend
            .as_ref()
            .as_any()
            .downcast_ref::<InMemoryBackend>()
        {
            memory_backend.get_metrics_by_namespace(namespace)
        } else {
            // Fallback for other backends
            self.backend
                .list_all_metrics()
                .into_iter()
                .filter(|m| m.metadata.id.namespace == namespace)
                .collect()
        }
    }

    /// Get the total number of metrics
    pub fn metric_count(&self) -> usize {
        self.backend.metric_count()
    }

    /// Clear all metrics
    pub fn clear_all(&self) -> MetricsResult<()> {
        self.backend.clear_all()
    }

    /// Snapshot every metric in export form, sorted by name for stable
    /// output.
    pub fn snapshot(&self) -> Vec<MetricSnapshot> {
        let mut snapshots: Vec<MetricSnapshot> = self
            .backend
            .list_all_metrics()
            .iter()
            .map(Metric::snapshot)
            .collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }

    /// Render the full registry snapshot as JSON for external monitoring
    /// consumers.
    pub fn snapshot_json(&self) -> MetricsResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| MetricsError::StorageError(e.to_string()))
    }

    /// Get direct access to the backend (for advanced operations)
    pub fn backend(&self) -> &Arc<dyn MetricsBackend> {
        &self.backend
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for efficient gauge operations
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl GaugeHandle {
    fn new(id: MetricId, backend: Arc<dyn MetricsBackend>) -> Self {
        Self { id, backend }
    }

    /// Set the gauge to a specific value. No monotonicity or bounds check;
    /// values may shrink between samples.
    pub fn set(&self, value: u64) -> MetricsResult<()> {
        self.backend.set_gauge(&self.id, value)
    }

    /// Get the current gauge value
    pub fn get(&self) -> MetricsResult<u64> {
        let metric = self.backend.get_metric(&self.id)?;
        metric
            .value
            .as_gauge()
            .ok_or_else(|| MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: metric.value.metric_type(),
            })
    }

    /// Get the metric ID
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}
