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

//! Abstract definitions for the runtime's externally observable metrics.

use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::time::Instant;

/// A unique, structured identifier for a metric.
///
/// A `MetricId` is composed of a namespace and a name; the pair is the
/// metric's identity for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// The fully qualified category of the metric (e.g., "kiln.gc.metaspace").
    pub namespace: String,
    /// The specific name of the metric (e.g., "capacity", "used").
    pub name: String,
}

impl MetricId {
    /// Creates a new `MetricId` from a namespace and a name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns a formatted string representation of the ID ("namespace:name").
    pub fn to_string_formatted(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_formatted())
    }
}

/// The fundamental type of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricType {
    /// A value set once at registration and never updated
    /// (e.g., the minimum chunk granularity of a region).
    Constant,
    /// A byte count that can go up or down between samples
    /// (e.g., current metaspace capacity).
    Gauge,
}

/// An enumeration of possible metric values.
///
/// All values in this system are byte counts; `u64` everywhere.
#[derive(Debug, Clone, Copy)]
pub enum MetricValue {
    /// An immutable value, fixed at registration time.
    Constant(u64),
    /// A mutable value, overwritten in place on every sample.
    Gauge(u64),
}

impl MetricValue {
    /// Returns the [`MetricType`] corresponding to this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricValue::Constant(_) => MetricType::Constant,
            MetricValue::Gauge(_) => MetricType::Gauge,
        }
    }

    /// Returns the raw value regardless of kind.
    pub fn as_u64(&self) -> u64 {
        match self {
            MetricValue::Constant(v) | MetricValue::Gauge(v) => *v,
        }
    }

    /// Returns the value if it is a `Constant`.
    pub fn as_constant(&self) -> Option<u64> {
        match self {
            MetricValue::Constant(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value if it is a `Gauge`.
    pub fn as_gauge(&self) -> Option<u64> {
        match self {
            MetricValue::Gauge(v) => Some(*v),
            _ => None,
        }
    }
}

/// Descriptive, static metadata about a metric.
#[derive(Debug, Clone)]
pub struct MetricMetadata {
    /// The metric's unique identifier.
    pub id: MetricId,
    /// The type of the metric.
    pub metric_type: MetricType,
    /// A human-readable description of what the metric measures.
    pub description: String,
    /// The unit of measurement ("bytes" for every metric in this system).
    pub unit: String,
    /// The timestamp when this metric was first registered.
    pub created_at: Instant,
    /// The timestamp when this metric was last updated.
    pub last_updated: Instant,
}

impl MetricMetadata {
    /// Creates new metadata for a metric.
    pub fn new(
        id: MetricId,
        metric_type: MetricType,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        let now = Instant::now();
        Self {
            id,
            metric_type,
            description: description.into(),
            unit: unit.into(),
            created_at: now,
            last_updated: now,
        }
    }

    /// Updates the `last_updated` timestamp to the current time.
    pub fn update_timestamp(&mut self) {
        self.last_updated = Instant::now();
    }
}

/// A complete metric entry, combining its value with its descriptive metadata.
#[derive(Debug, Clone)]
pub struct Metric {
    /// The static, descriptive metadata for the metric.
    pub metadata: MetricMetadata,
    /// The current value of the metric.
    pub value: MetricValue,
}

impl Metric {
    /// A convenience constructor for creating a new `Constant` metric.
    pub fn new_constant(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        value: u64,
    ) -> Self {
        Self {
            metadata: MetricMetadata::new(id, MetricType::Constant, description, unit),
            value: MetricValue::Constant(value),
        }
    }

    /// A convenience constructor for creating a new `Gauge` metric.
    pub fn new_gauge(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        initial_value: u64,
    ) -> Self {
        Self {
            metadata: MetricMetadata::new(id, MetricType::Gauge, description, unit),
            value: MetricValue::Gauge(initial_value),
        }
    }

    /// Renders this metric as its serializable export form.
    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            name: self.metadata.id.to_string_formatted(),
            metric_type: self.metadata.metric_type,
            unit: self.metadata.unit.clone(),
            value: self.value.as_u64(),
        }
    }
}

/// The serializable export form of one metric, consumed by external
/// monitoring tools through the registry's snapshot surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    /// The formatted metric identifier ("namespace:name").
    pub name: String,
    /// The type of the metric.
    pub metric_type: MetricType,
    /// The unit of measurement.
    pub unit: String,
    /// The current value.
    pub value: u64,
}

/// A specialized `Result` type for metric-related operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// An error that can occur within the metrics system.
#[derive(Debug, Clone)]
pub enum MetricsError {
    /// The requested metric was not found in the registry.
    MetricNotFound(MetricId),
    /// An operation was attempted on a metric of the wrong type
    /// (e.g., trying to overwrite a constant).
    TypeMismatch {
        /// The expected metric type for the operation.
        expected: MetricType,
        /// The actual metric type that was found.
        found: MetricType,
    },
    /// An error originating from the backend storage layer.
    StorageError(String),
    /// An invalid operation was attempted (e.g., replacing a registered
    /// constant with a different value).
    InvalidOperation(String),
}

impl Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::MetricNotFound(id) => write!(f, "Metric not found: {id}"),
            MetricsError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {expected:?}, found {found:?}")
            }
            MetricsError::StorageError(msg) => write!(f, "Storage error: {msg}"),
            MetricsError::InvalidOperation(msg) => write!(f, "Invalid operation: {msg}"),
        }
    }
}

impl std::error::Error for MetricsError {}
