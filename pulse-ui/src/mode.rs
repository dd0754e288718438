//! Build Mode
//!
//! Compile-time switch between development and production behaviour, plus
//! the constants the build bakes into the bundle.

use std::fmt;

/// Dashboard version, baked in at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Development or production build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Parse a `PULSE_BUILD_MODE` value
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(BuildMode::Development),
            "production" | "prod" => Some(BuildMode::Production),
            _ => None,
        }
    }

    /// Mode of this build.
    ///
    /// `PULSE_BUILD_MODE` at compile time wins; otherwise debug builds are
    /// development and release builds are production.
    pub fn current() -> Self {
        option_env!("PULSE_BUILD_MODE")
            .and_then(Self::from_flag)
            .unwrap_or(if cfg!(debug_assertions) {
                BuildMode::Development
            } else {
                BuildMode::Production
            })
    }

    pub fn is_development(self) -> bool {
        self == BuildMode::Development
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Development => f.write_str("development"),
            BuildMode::Production => f.write_str("production"),
        }
    }
}

/// True in development builds; gates diagnostics in the UI and console
pub fn debug() -> bool {
    BuildMode::current().is_development()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flag() {
        assert_eq!(BuildMode::from_flag("production"), Some(BuildMode::Production));
        assert_eq!(BuildMode::from_flag(" Prod "), Some(BuildMode::Production));
        assert_eq!(BuildMode::from_flag("DEV"), Some(BuildMode::Development));
        assert_eq!(BuildMode::from_flag("staging"), None);
        assert_eq!(BuildMode::from_flag(""), None);
    }

    #[test]
    fn test_debug_follows_mode() {
        assert_eq!(debug(), BuildMode::current() == BuildMode::Development);
    }

    #[test]
    fn test_version_is_package_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
