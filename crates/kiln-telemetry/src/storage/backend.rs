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

use kiln_core::telemetry::metrics::MetricType;
use kiln_core::telemetry::{Metric, MetricId, MetricValue, MetricsError, MetricsResult};
use std::fmt::Debug;

/// Trait defining the interface for metrics storage backends
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Get a reference to this object as Any for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Store or update a metric. A registered constant is immutable:
    /// implementations must reject replacing it with a different value.
    fn put_metric(&self, metric: Metric) -> MetricsResult<()>;

    /// Store a group of metrics. The default implementation loops over
    /// `put_metric`; backends that can insert the whole group under one
    /// critical section should override it, since counter publishers rely
    /// on group registration being all-or-nothing.
    fn put_metrics(&self, metrics: Vec<Metric>) -> MetricsResult<()> {
        for metric in metrics {
            self.put_metric(metric)?;
        }
        Ok(())
    }

    /// Retrieve a metric by ID
    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Check if a metric exists
    fn contains_metric(&self, id: &MetricId) -> bool;

    /// Get all metrics (potentially expensive operation)
    fn list_all_metrics(&self) -> Vec<Metric>;

    /// Clear all metrics
    fn clear_all(&self) -> MetricsResult<()>;

    /// Get the number of metrics stored
    fn metric_count(&self) -> usize;

    // Convenience methods for common operations

    /// Set a gauge value. Constants are rejected with a type mismatch.
    fn set_gauge(&self, id: &MetricId, value: u64) -> MetricsResult<()> {
        let mut metric = self.get_metric(id)?;

        match metric.value {
            MetricValue::Gauge(ref mut gauge_value) => {
                *gauge_value = value;
                metric.metadata.update_timestamp();
                self.put_metric(metric)?;
                Ok(())
            }
            _ => Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: metric.value.metric_type(),
            }),
        }
    }
}

/// Statistics about the metrics backend
#[derive(Debug, Clone)]
pub struct BackendStats {
    /// Total number of metrics stored
    pub total_metrics: usize,
    /// Number of constants
    pub constant_count: usize,
    /// Number of gauges
    pub gauge_count: usize,
}
