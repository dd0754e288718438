//! Bootstrap
//!
//! Mounts the dashboard into its container and wires the live-reload channel
//! to the mount handle. Runs once per page load.

use leptos::*;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use wasm_bindgen::JsCast;

use crate::app::App;
use crate::channel::{self, ChannelState};
use crate::endpoint::{Endpoint, EndpointError, PageLocation};
use crate::mode::{BuildMode, VERSION};
use crate::state::Runtime;

/// Id of the element the dashboard mounts into
pub const MOUNT_POINT_ID: &str = "app";

#[derive(Debug, Error, PartialEq)]
pub enum BootstrapError {
    #[error("Mount container #{0} not found in the document")]
    MissingContainer(String),

    #[error("Dashboard is already mounted on this page")]
    AlreadyMounted,

    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// One-shot guard for "one mounted tree per page"
pub struct MountSlot {
    claimed: AtomicBool,
}

impl MountSlot {
    pub const fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
        }
    }

    pub fn claim(&self) -> Result<(), BootstrapError> {
        if self.claimed.swap(true, Ordering::SeqCst) {
            return Err(BootstrapError::AlreadyMounted);
        }
        Ok(())
    }
}

impl Default for MountSlot {
    fn default() -> Self {
        Self::new()
    }
}

static PAGE_MOUNT: MountSlot = MountSlot::new();

/// Something the root view can be mounted into
pub trait Container {
    fn mount(self, runtime: Runtime);
}

impl Container for web_sys::HtmlElement {
    fn mount(self, runtime: Runtime) {
        mount_to(self, move || {
            provide_context(runtime);
            view! { <App /> }
        });
    }
}

/// Mount into `container` and return the page runtime.
///
/// The endpoint is computed here, once, and never again.
pub fn bootstrap_with<C: Container>(
    slot: &MountSlot,
    container_id: &str,
    container: Option<C>,
    mode: BuildMode,
    location: &PageLocation,
) -> Result<Runtime, BootstrapError> {
    let container =
        container.ok_or_else(|| BootstrapError::MissingContainer(container_id.to_string()))?;
    slot.claim()?;

    let runtime = Runtime::new(mode, Endpoint::select(mode, location));
    container.mount(runtime.clone());
    Ok(runtime)
}

fn find_container(id: &str) -> Option<web_sys::HtmlElement> {
    document()
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
}

/// Mount the dashboard into the page's `#container_id` element
pub fn bootstrap(container_id: &str) -> Result<Runtime, BootstrapError> {
    let location = PageLocation::from_window()?;
    bootstrap_with(
        &PAGE_MOUNT,
        container_id,
        find_container(container_id),
        BuildMode::current(),
        &location,
    )
}

/// Page entry point: mount, then start listening for render signals.
///
/// A missing container is fatal. A socket that cannot be opened only leaves
/// the dashboard without live updates.
pub fn start() {
    let runtime = match bootstrap(MOUNT_POINT_ID) {
        Ok(runtime) => runtime,
        Err(e) => {
            web_sys::console::error_1(&format!("Pulse dashboard cannot start: {}", e).into());
            wasm_bindgen::throw_str(&e.to_string());
        }
    };

    web_sys::console::log_1(
        &format!(
            "Pulse dashboard v{} ({}), live reload via {}",
            VERSION, runtime.mode, runtime.endpoint
        )
        .into(),
    );

    match channel::listen(&runtime.endpoint, runtime.mount, runtime.connection) {
        Ok(subscription) => subscription.persist(),
        Err(e) => {
            web_sys::console::error_1(&e.to_string().into());
            runtime.connection.set(ChannelState::Closed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeContainer {
        mounts: Rc<Cell<usize>>,
    }

    impl Container for FakeContainer {
        fn mount(self, _runtime: Runtime) {
            self.mounts.set(self.mounts.get() + 1);
        }
    }

    fn location() -> PageLocation {
        PageLocation::parse("http://localhost:8080/app").unwrap()
    }

    #[test]
    fn test_mounts_exactly_once() {
        let runtime = create_runtime();
        let slot = MountSlot::new();
        let mounts = Rc::new(Cell::new(0));

        let first = bootstrap_with(
            &slot,
            "app",
            Some(FakeContainer {
                mounts: Rc::clone(&mounts),
            }),
            BuildMode::Development,
            &location(),
        );
        assert!(first.is_ok());

        let second = bootstrap_with(
            &slot,
            "app",
            Some(FakeContainer {
                mounts: Rc::clone(&mounts),
            }),
            BuildMode::Development,
            &location(),
        );
        assert_eq!(second.unwrap_err(), BootstrapError::AlreadyMounted);
        assert_eq!(mounts.get(), 1);

        runtime.dispose();
    }

    #[test]
    fn test_missing_container_is_fatal() {
        let slot = MountSlot::new();
        let result =
            bootstrap_with::<FakeContainer>(&slot, "app", None, BuildMode::Production, &location());
        assert_eq!(
            result.unwrap_err(),
            BootstrapError::MissingContainer("app".to_string())
        );
        // the slot is still free: nothing was mounted
        assert!(slot.claim().is_ok());
    }

    #[test]
    fn test_endpoint_chosen_at_bootstrap() {
        let runtime = create_runtime();
        let slot = MountSlot::new();
        let mounts = Rc::new(Cell::new(0));

        let page = bootstrap_with(
            &slot,
            "app",
            Some(FakeContainer { mounts }),
            BuildMode::Production,
            &location(),
        )
        .unwrap();
        assert_eq!(page.endpoint.as_str(), "ws://localhost:8080/ws");
        assert_eq!(page.mode, BuildMode::Production);

        runtime.dispose();
    }

    #[test]
    fn test_slot_claims_once() {
        let slot = MountSlot::new();
        assert!(slot.claim().is_ok());
        assert_eq!(slot.claim(), Err(BootstrapError::AlreadyMounted));
    }
}
