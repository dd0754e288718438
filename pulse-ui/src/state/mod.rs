//! State Management
//!
//! The page runtime: build mode, live-reload endpoint, mount handle and
//! connection state, handed to components through Leptos context.

pub mod runtime;

pub use runtime::{use_runtime, MountHandle, Runtime};
