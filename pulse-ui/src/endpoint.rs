//! Live-Reload Endpoint
//!
//! Chooses the websocket URL the dashboard listens on:
//!
//! - production: the agent serves the page, so `ws://<host>/ws` on the same
//!   host and port
//! - development: the page comes from the trunk dev server, the agent still
//!   runs on its own port: `ws://<hostname>:22682/ws`

use std::fmt;
use thiserror::Error;
use url::Url;

use crate::mode::BuildMode;

/// Port the agent listens on during development
pub const DEV_SERVER_PORT: u16 = 22682;

/// Path of the agent's websocket
pub const LIVE_RELOAD_PATH: &str = "/ws";

#[derive(Debug, Error, PartialEq)]
pub enum EndpointError {
    #[error("No browser window available")]
    NoWindow,

    #[error("Unusable page location: {0}")]
    InvalidLocation(String),
}

/// The parts of `window.location` the endpoint depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Hostname plus port when the port is not the scheme default
    pub host: String,
    /// Hostname only
    pub hostname: String,
}

impl PageLocation {
    /// Read the current page location
    pub fn from_window() -> Result<Self, EndpointError> {
        let location = web_sys::window().ok_or(EndpointError::NoWindow)?.location();
        let host = location
            .host()
            .map_err(|e| EndpointError::InvalidLocation(format!("{:?}", e)))?;
        let hostname = location
            .hostname()
            .map_err(|e| EndpointError::InvalidLocation(format!("{:?}", e)))?;
        Ok(Self { host, hostname })
    }

    /// Derive the location fields from a full URL, the way a browser does
    pub fn parse(href: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(href).map_err(|e| EndpointError::InvalidLocation(e.to_string()))?;
        let hostname = url
            .host_str()
            .ok_or_else(|| EndpointError::InvalidLocation(format!("{} has no host", href)))?
            .to_string();
        // `port()` is None for the scheme's default port, as in `location.host`
        let host = match url.port() {
            Some(port) => format!("{}:{}", hostname, port),
            None => hostname.clone(),
        };
        Ok(Self { host, hostname })
    }
}

/// Websocket URL for live reload, fixed for the page's lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn select(mode: BuildMode, location: &PageLocation) -> Self {
        let url = match mode {
            BuildMode::Production => format!("ws://{}{}", location.host, LIVE_RELOAD_PATH),
            BuildMode::Development => format!(
                "ws://{}:{}{}",
                location.hostname, DEV_SERVER_PORT, LIVE_RELOAD_PATH
            ),
        };
        Endpoint(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(mode: BuildMode, href: &str) -> String {
        Endpoint::select(mode, &PageLocation::parse(href).unwrap()).to_string()
    }

    #[test]
    fn test_production_keeps_page_port() {
        assert_eq!(
            endpoint(BuildMode::Production, "https://example.com:8080/app"),
            "ws://example.com:8080/ws"
        );
    }

    #[test]
    fn test_production_without_port() {
        assert_eq!(
            endpoint(BuildMode::Production, "http://monitor.internal/hosts"),
            "ws://monitor.internal/ws"
        );
        // default port is dropped like location.host does
        assert_eq!(
            endpoint(BuildMode::Production, "https://example.com:443/"),
            "ws://example.com/ws"
        );
    }

    #[test]
    fn test_development_uses_agent_port() {
        assert_eq!(
            endpoint(BuildMode::Development, "http://localhost:8080/app"),
            "ws://localhost:22682/ws"
        );
        assert_eq!(
            endpoint(BuildMode::Development, "https://example.com:9999/x?y=1"),
            "ws://example.com:22682/ws"
        );
    }

    #[test]
    fn test_ipv6_host() {
        let location = PageLocation::parse("http://[::1]:8080/").unwrap();
        assert_eq!(location.hostname, "[::1]");
        assert_eq!(location.host, "[::1]:8080");
        assert_eq!(
            Endpoint::select(BuildMode::Development, &location).as_str(),
            "ws://[::1]:22682/ws"
        );
    }

    #[test]
    fn test_location_fields_used_verbatim() {
        let location = PageLocation {
            host: "dash.example:3000".to_string(),
            hostname: "dash.example".to_string(),
        };
        assert_eq!(
            Endpoint::select(BuildMode::Production, &location).as_str(),
            "ws://dash.example:3000/ws"
        );
    }

    #[test]
    fn test_invalid_location() {
        assert!(matches!(
            PageLocation::parse("not a url"),
            Err(EndpointError::InvalidLocation(_))
        ));
        assert!(matches!(
            PageLocation::parse("data:text/plain,hi"),
            Err(EndpointError::InvalidLocation(_))
        ));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_from_window_matches_href() {
        let href = web_sys::window().unwrap().location().href().unwrap();
        assert_eq!(
            PageLocation::from_window().unwrap(),
            PageLocation::parse(&href).unwrap()
        );
    }
}
