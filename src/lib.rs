//! Desktop WebGL bindings: a WebGL 2 style rendering context over OpenGL, an image loader
//! and a window backend, composed by [`init`] and exported under three fixed keys.
//!
//! ```no_run
//! let exports = native_webgl::init(Default::default())?;
//! exports.webgl.clear_color(0.1, 0.2, 0.3, 1.0);
//! exports.webgl.clear(glow::COLOR_BUFFER_BIT);
//! # Ok::<(), native_webgl::Error>(())
//! ```

pub mod config;
mod error;
pub mod image;
pub mod platform;
mod screenshot;
pub mod webgl;

use std::fmt;
use std::str::FromStr;

pub use self::config::*;
pub use self::error::*;
pub use self::image::{Image, ImageLoader};
pub use self::platform::Document;
pub use self::screenshot::*;
pub use self::webgl::WebGlRenderingContext;

/// The keys the bindings are exported under.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExportKey {
    WebGl,
    Image,
    Document,
}

impl ExportKey {
    pub const ALL: [ExportKey; 3] = [ExportKey::WebGl, ExportKey::Image, ExportKey::Document];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportKey::WebGl => "webgl",
            ExportKey::Image => "Image",
            ExportKey::Document => "document",
        }
    }
}

impl fmt::Display for ExportKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown export {0:?}")]
pub struct UnknownExport(pub String);

impl FromStr for ExportKey {
    type Err = UnknownExport;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ExportKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownExport(s.to_owned()))
    }
}

/// The value under one export key.
pub enum Export<'a, D: ?Sized> {
    WebGl(&'a WebGlRenderingContext),
    Image(&'a ImageLoader),
    Document(&'a D),
}

/// The composed bindings.
///
/// Fields drop in declaration order, so the context releases its objects while the
/// document's GL context still exists.
pub struct Exports<D: Document> {
    pub webgl: WebGlRenderingContext,
    pub image: ImageLoader,
    pub document: D,
}

impl<D: Document> Exports<D> {
    pub fn keys(&self) -> [&'static str; 3] {
        ExportKey::ALL.map(ExportKey::as_str)
    }

    pub fn get(&self, key: ExportKey) -> Export<'_, D> {
        match key {
            ExportKey::WebGl => Export::WebGl(&self.webgl),
            ExportKey::Image => Export::Image(&self.image),
            ExportKey::Document => Export::Document(&self.document),
        }
    }
}

/// Applies the driver overrides, opens the configured platform backend and creates a
/// WebGL context on it.
pub fn init(options: InitOptions) -> Result<Exports<Box<dyn Document>>> {
    apply_driver_overrides(&options);
    let document = platform::create_document(&options)?;
    compose(document, &options)
}

/// Like [`init`], but with a document the caller already created. The driver overrides
/// only take effect if they were applied before the document's backend was initialised.
pub fn init_with<D: Document>(document: D, options: InitOptions) -> Result<Exports<D>> {
    apply_driver_overrides(&options);
    compose(document, &options)
}

fn compose<D: Document>(mut document: D, options: &InitOptions) -> Result<Exports<D>> {
    if !options.window.title.is_empty() {
        document.set_title(&options.window.title);
    }
    let webgl = WebGlRenderingContext::new(&mut document, options.window.debug_context)?;
    let image = ImageLoader::new(options.image_base_dir.clone());
    Ok(Exports { webgl, image, document })
}
