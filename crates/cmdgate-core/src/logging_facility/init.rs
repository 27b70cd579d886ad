//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Resolve a profile from a CLI/env value; unknown names fall back to Development
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "json" => Profile::Production,
            "test" => Profile::Test,
            _ => Profile::Development,
        }
    }
}

static INIT_ONCE: Once = Once::new();

const CRATE_TARGETS: [&str; 6] = [
    "cmdgate_core",
    "cmdgate_store",
    "cmdgate_engine",
    "cmdgate_http",
    "cmdgate_cli",
    "tower_http",
];

/// Filter directives applied when `RUST_LOG` is unset
fn default_directives(level: &str) -> String {
    CRATE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the logging facility
///
/// Call once from the process entry point; later calls are ignored, as is
/// a subscriber installed elsewhere first. Output goes to stderr.
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Capture mode for test assertions
///
/// # Example
///
/// ```
/// use cmdgate_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        match profile {
            Profile::Development => {
                let _ = tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new(default_directives("debug"))),
                    )
                    .try_init();
            }
            Profile::Production => {
                let _ = tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new(default_directives("info"))),
                    )
                    .try_init();
            }
            Profile::Test => {
                // capture layer is installed by init_test_capture()
                let _ = tracing_subscriber::registry().try_init();
            }
        }
    });
}
