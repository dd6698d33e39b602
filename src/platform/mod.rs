//! Window and input backends a WebGL context can render into.

mod event;
mod glfw;
mod main_loop;

use cgmath::Vector2;
use std::os::raw::c_void;

use crate::config::{InitOptions, PlatformBackend};

pub use self::event::*;
pub use self::glfw::*;
pub use self::main_loop::*;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("failed to initialize GLFW")]
    Init,
    #[error("failed to create a {width}x{height} window")]
    CreateWindow { width: u32, height: u32 },
}

/// A window with a current GL context, plus the events it produces.
///
/// All methods must be called on the thread that created the document.
pub trait Document {
    /// Framebuffer size in pixels.
    fn inner_size(&self) -> Vector2<u32>;
    fn set_title(&mut self, title: &str);
    /// Processes pending window-system events and returns the translated ones.
    fn poll_events(&mut self) -> Vec<Event>;
    fn swap_buffers(&mut self);
    fn should_close(&self) -> bool;
    fn close(&mut self);
    /// Looks up a GL entry point for the document's context.
    fn proc_address(&mut self, name: &str) -> *const c_void;
    /// Seconds since the backend was initialized.
    fn time(&self) -> f64;
}

impl<D: Document + ?Sized> Document for Box<D> {
    fn inner_size(&self) -> Vector2<u32> {
        (**self).inner_size()
    }

    fn set_title(&mut self, title: &str) {
        (**self).set_title(title)
    }

    fn poll_events(&mut self) -> Vec<Event> {
        (**self).poll_events()
    }

    fn swap_buffers(&mut self) {
        (**self).swap_buffers()
    }

    fn should_close(&self) -> bool {
        (**self).should_close()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn proc_address(&mut self, name: &str) -> *const c_void {
        (**self).proc_address(name)
    }

    fn time(&self) -> f64 {
        (**self).time()
    }
}

/// Creates the document selected by `options.platform`.
pub fn create_document(options: &InitOptions) -> Result<Box<dyn Document>, PlatformError> {
    Ok(match options.platform {
        PlatformBackend::Glfw => Box::new(GlfwDocument::new(&options.window)?),
        PlatformBackend::Offscreen => Box::new(OffscreenDocument::new(&options.window)?),
    })
}
