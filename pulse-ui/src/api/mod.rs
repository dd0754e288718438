//! Agent API
//!
//! HTTP access to the agent's data files.

pub mod client;

pub use client::{fetch_status, CpuTimes, LoadAvg, MachineSnapshot, StatusSnapshot};
