//! Page Runtime
//!
//! Reactive handles created once by the bootstrap and shared explicitly:
//! provided as context to the component tree and passed by value to the
//! live-reload channel.

use leptos::*;

use crate::channel::{ChannelState, RenderSignal, RenderSink};
use crate::endpoint::Endpoint;
use crate::mode::BuildMode;

/// Handle to the mounted UI tree.
///
/// Its only capability is requesting a re-render: views that show agent data
/// track [`MountHandle::generation`] and refresh in place when it moves.
#[derive(Debug, Clone, Copy)]
pub struct MountHandle {
    generation: RwSignal<u64>,
}

impl MountHandle {
    pub fn new() -> Self {
        Self {
            generation: create_rw_signal(0),
        }
    }

    /// Ask every tracking view to refresh
    pub fn queue_render(&self) {
        self.generation.update(|generation| *generation += 1);
    }

    /// Current render generation (tracked)
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Current render generation without subscribing
    pub fn generation_untracked(&self) -> u64 {
        self.generation.get_untracked()
    }
}

impl Default for MountHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for MountHandle {
    fn request_render(&self, _signal: RenderSignal) {
        self.queue_render();
    }
}

/// Everything the page needs that the framework does not own
#[derive(Debug, Clone)]
pub struct Runtime {
    pub mode: BuildMode,
    pub endpoint: Endpoint,
    pub mount: MountHandle,
    /// Live-reload connection state, written by the channel
    pub connection: RwSignal<ChannelState>,
}

impl Runtime {
    pub fn new(mode: BuildMode, endpoint: Endpoint) -> Self {
        Self {
            mode,
            endpoint,
            mount: MountHandle::new(),
            connection: create_rw_signal(ChannelState::Connecting),
        }
    }
}

/// Runtime provided by the bootstrap
pub fn use_runtime() -> Runtime {
    use_context::<Runtime>().expect("Runtime not provided; mount through bootstrap")
}
