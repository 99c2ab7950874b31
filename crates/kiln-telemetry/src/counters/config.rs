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

use serde::{Deserialize, Serialize};

/// Configuration for the metaspace performance counters.
///
/// The embedder resolves its runtime flags once at startup and injects them
/// here; the counters never consult process globals afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfCountersConfig {
    /// Whether performance data publishing is enabled at all. When false,
    /// initialization and updates are silent no-ops and no metrics exist.
    pub enabled: bool,
    /// Whether the runtime narrows class references to compressed pointers,
    /// which gives class metadata its own dedicated region.
    pub compressed_class_pointers: bool,
}

impl PerfCountersConfig {
    /// Configuration with performance data on and compressed class
    /// pointers off.
    pub fn with_perf_data() -> Self {
        Self {
            enabled: true,
            compressed_class_pointers: false,
        }
    }

    /// Configuration with performance data and compressed class pointers on.
    pub fn with_compressed_class_pointers() -> Self {
        Self {
            enabled: true,
            compressed_class_pointers: true,
        }
    }
}

impl Default for PerfCountersConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            compressed_class_pointers: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fully_disabled() {
        let config = PerfCountersConfig::default();
        assert!(!config.enabled);
        assert!(!config.compressed_class_pointers);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PerfCountersConfig::with_compressed_class_pointers();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PerfCountersConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
