use cgmath::*;
use glfw::Context as GlfwContext;
use glfw::Glfw;
use std::os::raw::c_void;
use std::sync::mpsc::Receiver;

use super::event::*;
use super::{Document, PlatformError};
use crate::config::WindowConfig;

type EventReceiver = Receiver<(f64, glfw::WindowEvent)>;

thread_local!(static GLOBAL_GLFW: Option<Glfw> = match glfw::init(glfw::LOG_ERRORS) {
    Ok(glfw) => Some(glfw),
    Err(err) => {
        log::error!("GLFW initialization failed: {:?}", err);
        None
    }
});

/// Returns this thread's GLFW instance, initializing it on first use.
pub fn get_glfw() -> Result<Glfw, PlatformError> {
    GLOBAL_GLFW.with(|glfw| glfw.clone()).ok_or(PlatformError::Init)
}

fn set_window_hints(glfw: &mut Glfw, config: &WindowConfig, visible: bool) {
    glfw.default_window_hints();
    glfw.window_hint(glfw::WindowHint::Visible(visible));
    glfw.window_hint(glfw::WindowHint::OpenGlDebugContext(config.debug_context));
    glfw.window_hint(glfw::WindowHint::Samples(config.samples));
    glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

    let (major, minor) = config.context_version;
    glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
}

fn create_window(
    glfw: &mut Glfw,
    config: &WindowConfig,
    visible: bool,
) -> Result<(glfw::Window, EventReceiver), PlatformError> {
    set_window_hints(glfw, config, visible);
    let (mut window, events) = glfw
        .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
        .ok_or(PlatformError::CreateWindow { width: config.width, height: config.height })?;

    if visible {
        let video_mode = glfw.with_primary_monitor(|_, m| m.and_then(|m| m.get_video_mode()));
        match video_mode {
            Some(mode) => {
                let posx = mode.width.saturating_sub(config.width) / 2;
                let posy = mode.height.saturating_sub(config.height) / 2;
                window.set_pos(posx as i32, posy as i32);
            }
            None => log::warn!("No primary monitor; leaving window position to the system"),
        }
    }

    window.make_current();
    glfw.set_swap_interval(if config.vsync {
        glfw::SwapInterval::Sync(1)
    } else {
        glfw::SwapInterval::None
    });
    log::info!(
        "Created {}x{} GLFW window requesting GL {}.{} core",
        config.width,
        config.height,
        config.context_version.0,
        config.context_version.1
    );
    Ok((window, events))
}

/// A visible GLFW window that reports input events.
pub struct GlfwDocument {
    glfw: Glfw,
    window: glfw::Window,
    events: EventReceiver,
    prev_cursor_pos: Option<Point2<i32>>,
}

impl GlfwDocument {
    pub fn new(config: &WindowConfig) -> Result<Self, PlatformError> {
        let mut glfw = get_glfw()?;
        let (mut window, events) = create_window(&mut glfw, config, config.visible)?;
        window.set_all_polling(true);
        Ok(Self { glfw, window, events, prev_cursor_pos: None })
    }

    pub fn window(&self) -> &glfw::Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut glfw::Window {
        &mut self.window
    }
}

impl Document for GlfwDocument {
    fn inner_size(&self) -> Vector2<u32> {
        let (width, height) = self.window.get_framebuffer_size();
        vec2(width.max(0) as u32, height.max(0) as u32)
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn poll_events(&mut self) -> Vec<Event> {
        self.glfw.poll_events();
        let cursor_pos = self.window.get_cursor_pos();
        let mut events = vec![];
        for (_, event) in glfw::flush_messages(&self.events) {
            if let Some(event) = event_from_glfw(&event, cursor_pos, &mut self.prev_cursor_pos) {
                events.push(event);
            }
        }
        events
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn close(&mut self) {
        self.window.set_should_close(true);
    }

    fn proc_address(&mut self, name: &str) -> *const c_void {
        self.window.get_proc_address(name)
    }

    fn time(&self) -> f64 {
        self.glfw.get_time()
    }
}

/// A hidden GLFW window. Rendering goes to its default framebuffer, which is never shown,
/// and no input events are produced.
pub struct OffscreenDocument {
    glfw: Glfw,
    window: glfw::Window,
    events: EventReceiver,
}

impl OffscreenDocument {
    pub fn new(config: &WindowConfig) -> Result<Self, PlatformError> {
        let mut glfw = get_glfw()?;
        let (window, events) = create_window(&mut glfw, config, false)?;
        Ok(Self { glfw, window, events })
    }
}

impl Document for OffscreenDocument {
    fn inner_size(&self) -> Vector2<u32> {
        let (width, height) = self.window.get_framebuffer_size();
        vec2(width.max(0) as u32, height.max(0) as u32)
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn poll_events(&mut self) -> Vec<Event> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events).for_each(drop);
        vec![]
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn close(&mut self) {
        self.window.set_should_close(true);
    }

    fn proc_address(&mut self, name: &str) -> *const c_void {
        self.window.get_proc_address(name)
    }

    fn time(&self) -> f64 {
        self.glfw.get_time()
    }
}
