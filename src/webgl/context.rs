use glow::HasContext;
use std::cell::{Cell, RefCell, RefMut};
use std::rc::Rc;

use super::entry_points::EntryPoints;
use super::error::*;
use super::extensions::*;
use super::objects::*;
use super::parameters::*;
use super::pixels::*;
use super::shaders::{Attachments, ShaderTable};
use super::sync::*;
use crate::platform::Document;

/// A WebGL 2 style rendering context backed by a desktop OpenGL context.
///
/// Clones share the same context. When the last clone is dropped every object the caller
/// didn't delete is released.
#[derive(Clone)]
pub struct WebGlRenderingContext {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    gl: glow::Context,
    entry_points: EntryPoints,
    state: RefCell<ContextState>,
    id: ContextId,
    generation: Cell<u32>,
}

pub(crate) struct ContextState {
    pub objects: ObjectRegistry<RawObject>,
    pub syncs: SyncRegistry<GlFence>,
    pub pixel_store: PixelStore,
    pub attachments: Attachments<GlProgram, GlShader>,
    pub shaders: ShaderTable<GlShader>,
    // Core profiles have no implicit vertex array; this stands in for WebGL's.
    pub default_vertex_array: Option<GlVertexArray>,
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        release_all(&self.gl, self.state.get_mut());
    }
}

impl WebGlRenderingContext {
    /// Creates a context on `document`, whose GL context must be current on this thread.
    pub fn new<D: Document + ?Sized>(
        document: &mut D,
        debug_context: bool,
    ) -> Result<Self, WebGlError> {
        let gl = unsafe { glow::Context::from_loader_function(|s| document.proc_address(s)) };
        let entry_points = EntryPoints::load(|s| document.proc_address(s));
        Self::build(gl, entry_points, debug_context)
    }

    /// Wraps an already loaded `glow` context. Operations that need GL entry points `glow`
    /// doesn't wrap return `WebGlError::Unavailable`.
    pub fn from_glow(gl: glow::Context, debug_context: bool) -> Result<Self, WebGlError> {
        Self::build(gl, EntryPoints::default(), debug_context)
    }

    fn build(
        mut gl: glow::Context,
        entry_points: EntryPoints,
        debug_context: bool,
    ) -> Result<Self, WebGlError> {
        let missing = entry_points.missing();
        if !missing.is_empty() {
            log::debug!("Driver lacks {}", missing.join(", "));
        }

        let default_vertex_array = unsafe {
            gl.enable(glow::PROGRAM_POINT_SIZE);

            let vao = gl
                .create_vertex_array()
                .map_err(|e| WebGlError::CreateFailed(GlObjectKind::VertexArray, e))?;
            gl.bind_vertex_array(Some(vao));

            if debug_context && gl.supports_debug() {
                gl.enable(glow::DEBUG_OUTPUT);
                gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
                gl.debug_message_control(glow::DONT_CARE, glow::DONT_CARE, glow::DONT_CARE, &[], true);
                gl.debug_message_callback(debug_callback);
            }

            log::info!(
                "Created WebGL context on {} ({})",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER)
            );
            vao
        };

        Ok(Self {
            inner: Rc::new(ContextInner {
                gl,
                entry_points,
                state: RefCell::new(ContextState {
                    objects: ObjectRegistry::new(),
                    syncs: SyncRegistry::new(),
                    pixel_store: PixelStore::default(),
                    attachments: Attachments::new(),
                    shaders: ShaderTable::new(),
                    default_vertex_array: Some(default_vertex_array),
                }),
                id: ContextId::new(),
                generation: Cell::new(0),
            }),
        })
    }

    pub(crate) fn inner(&self) -> &glow::Context {
        &self.inner.gl
    }

    pub(crate) fn entry_points(&self) -> &EntryPoints {
        &self.inner.entry_points
    }

    pub(crate) fn state(&self) -> RefMut<ContextState> {
        self.inner.state.borrow_mut()
    }

    /// Identifies this context, and every clone of it.
    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    /// Stamped on every object handle created now. Only handles carrying the current owner
    /// resolve to GL names.
    pub(crate) fn owner(&self) -> Owner {
        Owner { context: self.inner.id, generation: self.inner.generation.get() }
    }

    /// Whether `object` was created here and not deleted since.
    pub(crate) fn is_live(&self, object: RawObject) -> bool {
        self.state().objects.contains(object)
    }

    pub(crate) fn track(&self, object: RawObject) {
        self.state().objects.register(object);
    }

    pub(crate) fn untrack(&self, object: RawObject) {
        self.state().objects.unregister(object);
    }

    /// Number of objects created through this context and not yet deleted.
    pub fn live_objects(&self) -> usize {
        self.state().objects.len()
    }

    pub fn live_objects_of_kind(&self, kind: GlObjectKind) -> usize {
        self.state().objects.count(kind)
    }

    /// Deletes every object still alive. The context stays usable, and handles created
    /// before this call fail with `InvalidOperation` from then on.
    pub fn destroy(&self) {
        let mut state = self.state();
        release_all(self.inner(), &mut state);
        state.attachments = Attachments::new();
        state.shaders = ShaderTable::new();
        state.default_vertex_array = unsafe { self.inner().create_vertex_array().ok() };
        unsafe { self.inner().bind_vertex_array(state.default_vertex_array) };
        self.inner.generation.set(self.inner.generation.get().wrapping_add(1));
    }

    pub fn get_error(&self) -> u32 {
        unsafe { self.inner().get_error() }
    }

    /// Returns the pending GL error, if any, as an `Err`.
    pub fn check_for_errors(&self) -> Result<(), WebGlError> {
        match self.get_error() {
            glow::NO_ERROR => Ok(()),
            err => Err(WebGlError::Gl(err)),
        }
    }

    pub fn flush(&self) {
        unsafe { self.inner().flush() }
    }

    pub fn finish(&self) {
        unsafe { self.inner().finish() }
    }

    /// Sets a pixel store parameter. Besides the GL parameters that change how many bytes
    /// a transfer touches, accepts `UNPACK_FLIP_Y_WEBGL` and `UNPACK_PREMULTIPLY_ALPHA_WEBGL`.
    pub fn pixel_storei(&self, pname: u32, param: i32) -> Result<(), WebGlError> {
        let action = self.state().pixel_store.set(pname, param)?;
        if action == StoreAction::Forward {
            unsafe { self.inner().pixel_store_i32(pname, param) }
        }
        Ok(())
    }

    pub fn pixel_store(&self) -> PixelStore {
        self.state().pixel_store
    }

    /// Queries a piece of context state. The shape of the result depends on `pname`; see
    /// `ParameterKind::of`.
    pub fn get_parameter(&self, pname: u32) -> Parameter {
        match pname {
            UNPACK_FLIP_Y_WEBGL => return Parameter::Bool(self.state().pixel_store.flip_y),
            UNPACK_PREMULTIPLY_ALPHA_WEBGL => {
                return Parameter::Bool(self.state().pixel_store.premultiply_alpha)
            }
            // Core profiles reject glGetString(GL_EXTENSIONS).
            glow::EXTENSIONS => return Parameter::String(self.get_supported_extensions().join(" ")),
            _ => (),
        }

        let gl = self.inner();
        unsafe {
            match ParameterKind::of(pname) {
                ParameterKind::Bool => Parameter::Bool(gl.get_parameter_i32(pname) != 0),
                ParameterKind::Int => {
                    // Room for a driver that answers with more than one value.
                    let mut value = [0; 16];
                    gl.get_parameter_i32_slice(pname, &mut value);
                    Parameter::Int(value[0])
                }
                ParameterKind::Float => {
                    let mut value = [0.0; 1];
                    gl.get_parameter_f32_slice(pname, &mut value);
                    Parameter::Float(value[0])
                }
                ParameterKind::String => Parameter::String(gl.get_parameter_string(pname)),
                ParameterKind::Int2 => {
                    let mut value = [0; 2];
                    gl.get_parameter_i32_slice(pname, &mut value);
                    Parameter::Int2(value)
                }
                ParameterKind::Int4 => {
                    let mut value = [0; 4];
                    gl.get_parameter_i32_slice(pname, &mut value);
                    Parameter::Int4(value)
                }
                ParameterKind::Float2 => {
                    let mut value = [0.0; 2];
                    gl.get_parameter_f32_slice(pname, &mut value);
                    Parameter::Float2(value)
                }
                ParameterKind::Float4 => {
                    let mut value = [0.0; 4];
                    gl.get_parameter_f32_slice(pname, &mut value);
                    Parameter::Float4(value)
                }
                ParameterKind::Bool4 => {
                    let mut value = [0; 4];
                    gl.get_parameter_i32_slice(pname, &mut value);
                    Parameter::Bool4(bools_from_ints(value))
                }
                ParameterKind::IntList(count) => {
                    let len = gl.get_parameter_i32(count).max(0) as usize;
                    let mut values = vec![0; len];
                    if len > 0 {
                        gl.get_parameter_i32_slice(pname, &mut values);
                    }
                    Parameter::IntList(values)
                }
                ParameterKind::IndexedInt3 => Parameter::Int3([
                    gl.get_parameter_indexed_i32(pname, 0),
                    gl.get_parameter_indexed_i32(pname, 1),
                    gl.get_parameter_indexed_i32(pname, 2),
                ]),
            }
        }
    }

    pub fn get_supported_extensions(&self) -> Vec<String> {
        sorted_extensions(self.inner().supported_extensions())
    }

    /// Returns the driver's name for the extension if it's supported.
    pub fn get_extension(&self, name: &str) -> Option<String> {
        find_extension(self.inner().supported_extensions().iter().map(|s| s.as_str()), name)
            .map(|s| s.to_owned())
    }
}

fn release_all(gl: &glow::Context, state: &mut ContextState) {
    let objects = state.objects.drain();
    let syncs = state.syncs.drain();
    log::debug!(
        "Releasing {} GL objects and {} fences",
        objects.len(),
        syncs.len()
    );

    unsafe {
        for object in objects {
            log::debug!("  Destroying {:?}", object);
            delete_raw(gl, object);
        }
        for sync in syncs {
            gl.delete_sync(sync);
        }
        if let Some(vao) = state.default_vertex_array.take() {
            gl.delete_vertex_array(vao);
        }
    }
}

pub(crate) unsafe fn delete_raw(gl: &glow::Context, object: RawObject) {
    match object {
        RawObject::Buffer(o) => gl.delete_buffer(o),
        RawObject::Framebuffer(o) => gl.delete_framebuffer(o),
        RawObject::Program(o) => gl.delete_program(o),
        RawObject::Renderbuffer(o) => gl.delete_renderbuffer(o),
        RawObject::Shader(o) => gl.delete_shader(o),
        RawObject::Texture(o) => gl.delete_texture(o),
        RawObject::Sampler(o) => gl.delete_sampler(o),
        RawObject::TransformFeedback(o) => gl.delete_transform_feedback(o),
        RawObject::VertexArray(o) => gl.delete_vertex_array(o),
    }
}

fn debug_callback(source: u32, typ: u32, _: u32, severity: u32, message: &str) {
    let source = match source {
        glow::DEBUG_SOURCE_API => "API",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window system",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "Third party",
        glow::DEBUG_SOURCE_APPLICATION => "Application",
        glow::DEBUG_SOURCE_OTHER => "Other",
        _ => "(Unknown)",
    };
    let typ = match typ {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated behavior",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined behavior",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        glow::DEBUG_TYPE_OTHER => "Other",
        _ => "(Unknown)",
    };
    let formatted = format!("{} {} {}", source, typ, message);

    match severity {
        glow::DEBUG_SEVERITY_HIGH => log::error!("{}", formatted),
        glow::DEBUG_SEVERITY_MEDIUM => log::warn!("{}", formatted),
        glow::DEBUG_SEVERITY_LOW => log::info!("{}", formatted),
        _ => log::trace!("{}", formatted),
    }
}
