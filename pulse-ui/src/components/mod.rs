//! UI Components
//!
//! Leptos components for the dashboard.

pub mod connection;
pub mod status_panel;

pub use connection::ConnectionBadge;
pub use status_panel::StatusPanel;
