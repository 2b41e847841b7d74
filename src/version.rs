//! Version information baked in at build time

/// The version of infiniscroll
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the application
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Get the full version string
pub fn full_version() -> String {
    format!("{} v{}", APP_NAME, VERSION)
}

/// User-Agent sent with every page request
pub fn user_agent() -> String {
    format!("{}/{}", APP_NAME, VERSION)
}
