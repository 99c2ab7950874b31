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

//! Performance counters for the runtime's metadata regions.
//!
//! Two regions publish counters: the metaspace proper, aggregated across all
//! chunk pools, and the compressed class space, scoped to the class pool
//! and only live when compressed class pointers are enabled. Both are
//! instances of the same [`region::RegionCounters`] component, driven by the
//! embedder's initialization and refresh points.

pub mod config;
pub mod publisher;
pub mod region;

pub use config::PerfCountersConfig;
pub use publisher::MetaspacePerfPublisher;
pub use region::RegionCounters;
