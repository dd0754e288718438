//! App Root Component
//!
//! Header, status panel and footer. The page runtime is provided as context
//! by the bootstrap before this component is created.

use leptos::*;

use crate::components::{ConnectionBadge, StatusPanel};
use crate::mode::{self, VERSION};
use crate::state::use_runtime;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="page">
            <Header />

            <main>
                <StatusPanel />
            </main>

            <Footer />
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    view! {
        <header>
            <h1>"Pulse"</h1>
            <span class="version">{format!("v{}", VERSION)}</span>
            <Show when=mode::debug>
                <span class="badge badge-debug">"DEBUG"</span>
            </Show>
        </header>
    }
}

/// Footer component showing connection status
#[component]
fn Footer() -> impl IntoView {
    let runtime = use_runtime();
    let mount = runtime.mount;
    let endpoint = runtime.endpoint.to_string();

    view! {
        <footer>
            <ConnectionBadge />
            <span class="label">{endpoint}</span>
            <span class="label">{move || format!("render #{}", mount.generation())}</span>
        </footer>
    }
}
