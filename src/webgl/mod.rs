//! A WebGL 2 rendering context implemented on desktop OpenGL through `glow`.

mod context;
mod drawing;
mod entry_points;
mod error;
mod extensions;
mod objects;
mod parameters;
mod pixels;
mod resources;
mod shaders;
mod state;
mod sync;
mod textures;
mod uniforms;

pub use self::context::*;
pub use self::drawing::VertexAttribKind;
pub use self::error::*;
pub use self::extensions::find_extension;
pub use self::objects::{
    ContextId, GlObjectKind, ObjectRegistry, Owner, TrackedObject, WebGlBuffer, WebGlFramebuffer,
    WebGlProgram, WebGlRenderbuffer, WebGlSampler, WebGlShader, WebGlSync, WebGlTexture,
    WebGlTransformFeedback, WebGlUniformLocation, WebGlVertexArrayObject,
};
pub use self::parameters::*;
pub use self::pixels::{PixelLayout, PixelStore, StoreAction};
pub use self::shaders::{
    Attachments, ProgramParameter, ShaderParameter, ShaderRecord, ShaderTable, WebGlActiveInfo,
    WebGlShaderPrecisionFormat,
};
pub use self::sync::SyncRegistry;
pub use self::uniforms::UniformValue;

pub(crate) use self::pixels::{flip_rows, premultiply_rgba8};
