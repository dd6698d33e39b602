//! Startup configuration.
//!
//! Everything here is plain data; the only side effect is [`apply_driver_overrides`], which
//! must run before the platform backend initialises the graphics driver.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The environment variable Mesa reads to report a different GL version.
pub const MESA_GL_VERSION_OVERRIDE: &str = "MESA_GL_VERSION_OVERRIDE";

/// The version the bindings ask Mesa to report unless configured otherwise.
pub const DEFAULT_GL_VERSION_OVERRIDE: &str = "4.6";

/// Which platform backend is exported under `document`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformBackend {
    /// A visible GLFW window with input events.
    Glfw,
    /// A hidden GLFW window; renders offscreen and never produces input events.
    Offscreen,
}

impl Default for PlatformBackend {
    fn default() -> Self {
        PlatformBackend::Glfw
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Ignored by the offscreen backend, whose window is never shown.
    pub visible: bool,
    pub resizable: bool,
    /// MSAA samples requested for the default framebuffer; `None` disables multisampling.
    pub samples: Option<u32>,
    pub debug_context: bool,
    pub vsync: bool,
    /// Requested `(major, minor)` core profile version.
    pub context_version: (u32, u32),
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: String::new(),
            visible: true,
            resizable: true,
            samples: Some(4),
            debug_context: false,
            vsync: false,
            context_version: (4, 6),
        }
    }
}

/// Options consumed by [`crate::init`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitOptions {
    /// Value written to `MESA_GL_VERSION_OVERRIDE`; `None` leaves the environment alone.
    pub gl_version_override: Option<String>,
    pub platform: PlatformBackend,
    pub window: WindowConfig,
    /// Directory relative image sources are resolved against.
    pub image_base_dir: Option<PathBuf>,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            gl_version_override: Some(DEFAULT_GL_VERSION_OVERRIDE.to_owned()),
            platform: PlatformBackend::default(),
            window: WindowConfig::default(),
            image_base_dir: None,
        }
    }
}

/// Writes the configured driver overrides into the process environment.
///
/// Any previous value is replaced. Must be called before GLFW is initialised, since the
/// driver reads the variable when the first context is created.
pub fn apply_driver_overrides(options: &InitOptions) {
    if let Some(version) = &options.gl_version_override {
        log::info!("Setting {}={}", MESA_GL_VERSION_OVERRIDE, version);
        std::env::set_var(MESA_GL_VERSION_OVERRIDE, version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_request_gl_4_6() {
        let options = InitOptions::default();
        assert_eq!(options.gl_version_override.as_deref(), Some("4.6"));
        assert_eq!(options.platform, PlatformBackend::Glfw);
        assert_eq!(options.window.context_version, (4, 6));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let options: InitOptions = serde_json::from_str(
            r#"{ "platform": "offscreen", "window": { "width": 320, "title": "demo" } }"#,
        )
        .unwrap();
        assert_eq!(options.platform, PlatformBackend::Offscreen);
        assert_eq!(options.window.width, 320);
        assert_eq!(options.window.height, 600);
        assert_eq!(options.window.title, "demo");
        assert_eq!(options.gl_version_override.as_deref(), Some("4.6"));
    }

    #[test]
    fn null_override_disables_it() {
        let options: InitOptions =
            serde_json::from_str(r#"{ "gl_version_override": null }"#).unwrap();
        assert_eq!(options.gl_version_override, None);
    }
}
