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

//! Provides a public interface for querying metaspace allocation statistics.
//!
//! This module forms a "contract" where the metaspace allocator is
//! responsible for keeping a set of aggregate counters current, and the
//! telemetry layer reads them in a thread-safe manner to publish occupancy
//! and capacity metrics. Nothing in here allocates, manages chunks, or
//! collects garbage; only already-computed aggregates live at this boundary.

pub mod metaspace;

pub use self::metaspace::{
    ChunkPoolKind, MetaspaceStatsProvider, PoolCounters, SharedMetaspaceStats, StatsScope,
};
