//! HTTP API Client
//!
//! Reads the agent's status file. Paths are relative to the page origin:
//! the agent serves the page in production, and trunk proxies `*.json`
//! to it during development.

use gloo_net::http::Request;
use std::collections::BTreeMap;

/// Status file path
pub const STATUS_PATH: &str = "/status.json";

// ============ Response Types ============

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct StatusSnapshot {
    pub version: String,
    pub pid: u32,
    pub hostname: String,
    pub startup_time: i64,
    #[serde(default)]
    pub last_scan: Option<i64>,
    #[serde(default)]
    pub scan_duration_ms: u64,
    #[serde(default)]
    pub scans: u64,
    #[serde(default)]
    pub boot_time: Option<u64>,
    #[serde(default)]
    pub connections: usize,
    #[serde(default)]
    pub machine: MachineSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct MachineSnapshot {
    #[serde(default)]
    pub uptime_secs: Option<f64>,
    #[serde(default)]
    pub idle_secs: Option<f64>,
    #[serde(default)]
    pub load_avg: Option<LoadAvg>,
    #[serde(default)]
    pub boot_time: Option<u64>,
    #[serde(default)]
    pub cpu: Option<CpuTimes>,
    #[serde(default)]
    pub open_files: Option<u64>,
    #[serde(default)]
    pub memory: BTreeMap<String, u64>,
    #[serde(default)]
    pub network: BTreeMap<String, InterfaceCounters>,
}

/// Cumulative CPU ticks by mode
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    fn total(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .iter()
        .fold(0u64, |sum, ticks| sum.saturating_add(*ticks))
    }

    fn waiting(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    /// Busy share in percent between `earlier` and `self`.
    ///
    /// Without an earlier sample (or when the counters did not move) the
    /// share is taken over the whole time since boot.
    pub fn busy_percent(&self, earlier: Option<&CpuTimes>) -> Option<f64> {
        let (total, waiting) = match earlier {
            Some(prev) if self.total() > prev.total() => (
                self.total() - prev.total(),
                self.waiting().saturating_sub(prev.waiting()),
            ),
            _ => (self.total(), self.waiting()),
        };
        if total == 0 {
            return None;
        }
        let busy = total.saturating_sub(waiting);
        Some(busy as f64 * 100.0 / total as f64)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct InterfaceCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct LoadAvg {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
    #[serde(default)]
    pub proc_runnable: Option<u64>,
    #[serde(default)]
    pub proc_total: Option<u64>,
}

impl MachineSnapshot {
    /// Used memory in bytes, from MemTotal minus MemAvailable
    pub fn memory_used(&self) -> Option<u64> {
        let total = self.memory.get("MemTotal")?;
        let available = self.memory.get("MemAvailable")?;
        Some(total.saturating_sub(*available))
    }

    pub fn memory_total(&self) -> Option<u64> {
        self.memory.get("MemTotal").copied()
    }
}

// ============ API Functions ============

/// Fetch the latest scan from the agent
pub async fn fetch_status() -> Result<StatusSnapshot, String> {
    let response = Request::get(STATUS_PATH)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.ok() {
        return Err(format!("{} returned HTTP {}", STATUS_PATH, response.status()));
    }

    response.json().await.map_err(|e| e.to_string())
}
