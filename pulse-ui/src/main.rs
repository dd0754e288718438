//! Pulse Dashboard
//!
//! Browser dashboard for the Pulse agent, built with Leptos (WASM).
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application. On load it mounts
//! into `#app`, then opens a receive-only websocket to the agent; every
//! message on that socket re-renders the views that show agent data.

mod api;
mod app;
mod bootstrap;
mod channel;
mod components;
mod endpoint;
mod mode;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    bootstrap::start();
}
