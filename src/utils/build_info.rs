//! Version stamp baked in by build.rs.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line version string, e.g. `dino-runner 0.1.0 (2026-10-18, a1b2c3d)`.
pub fn version_line() -> String {
    format!(
        "dino-runner {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    )
}
