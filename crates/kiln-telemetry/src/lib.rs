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

//! # Kiln Telemetry
//!
//! Publishes the Kiln runtime's metaspace occupancy and capacity metrics:
//! a metrics registry over a pluggable storage backend, plus the performance
//! counter publishers for the metaspace and the compressed class space.

pub mod counters;
pub mod metrics;
pub mod service;
pub mod storage;

pub use counters::config::PerfCountersConfig;
pub use counters::publisher::MetaspacePerfPublisher;
pub use counters::region::RegionCounters;
pub use metrics::registry::{GaugeHandle, MetricsRegistry};
pub use service::MetaspaceCountersService;
