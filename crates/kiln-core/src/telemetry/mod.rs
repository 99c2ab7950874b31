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

//! Provides the foundational data structures for runtime telemetry.
//!
//! This module defines the "common language" for the memory performance
//! counters: metric identity, metric values, and the errors the metric
//! storage layer can answer with. `kiln-telemetry` builds the registry,
//! storage backends, and the metaspace counter publishers on top of it.

pub mod metrics;

pub use self::metrics::{Metric, MetricId, MetricValue, MetricsError, MetricsResult};
