//! Simulation configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct CloudConfigRaw {
    /// message trip time between entities
    pub message_delay: Option<f64>,
    /// bandwidth used to derive cloudlet file transfer times
    pub storage_bandwidth_mbps: Option<f64>,
    /// vm initialization duration
    pub vm_start_delay: Option<f64>,
    /// period of idle datacenter processing updates (0 disables them)
    pub scheduling_interval: Option<f64>,
}

/// Represents the cloud model configuration.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct CloudConfig {
    /// message trip time between entities
    pub message_delay: f64,
    /// bandwidth used to derive cloudlet file transfer times
    pub storage_bandwidth_mbps: f64,
    /// vm initialization duration
    pub vm_start_delay: f64,
    /// period of idle datacenter processing updates (0 disables them)
    pub scheduling_interval: f64,
}

impl CloudConfig {
    /// Creates a config with default parameter values.
    pub fn new() -> Self {
        Self {
            message_delay: 0.,
            storage_bandwidth_mbps: 100.,
            vm_start_delay: 0.,
            scheduling_interval: 0.,
        }
    }

    /// Creates a config by reading parameter values from a .yaml file
    /// (uses default values if some parameters are absent).
    pub fn from_file(file_name: &str) -> Self {
        let raw: CloudConfigRaw = serde_yaml::from_str(
            &std::fs::read_to_string(file_name)
                .unwrap_or_else(|_| panic!("Can't read file {}", file_name)),
        )
        .unwrap_or_else(|_| panic!("Can't parse YAML from file {}", file_name));
        let default = CloudConfig::new();
        Self {
            message_delay: raw.message_delay.unwrap_or(default.message_delay),
            storage_bandwidth_mbps: raw
                .storage_bandwidth_mbps
                .unwrap_or(default.storage_bandwidth_mbps),
            vm_start_delay: raw.vm_start_delay.unwrap_or(default.vm_start_delay),
            scheduling_interval: raw.scheduling_interval.unwrap_or(default.scheduling_interval),
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self::new()
    }
}
