use glow::HasContext;
use uid::*;

use super::error::*;

#[doc(hidden)]
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub struct ContextId_(());

/// Identifies the context that created an object.
pub type ContextId = Id<ContextId_>;

/// The context an object was created by, and which of that context's generations it
/// belongs to. `destroy` starts a new generation, so handles from before it stop resolving.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Owner {
    pub(crate) context: ContextId,
    pub(crate) generation: u32,
}

impl Owner {
    pub(crate) fn check(self, current: Owner, what: &str) -> Result<(), WebGlError> {
        if self.context != current.context {
            Err(WebGlError::InvalidOperation(format!("{} belongs to another context", what)))
        } else if self.generation != current.generation {
            Err(WebGlError::InvalidOperation(format!(
                "{} was released when its context was destroyed",
                what
            )))
        } else {
            Ok(())
        }
    }
}

pub(crate) type GlBuffer = <glow::Context as HasContext>::Buffer;
pub(crate) type GlFramebuffer = <glow::Context as HasContext>::Framebuffer;
pub(crate) type GlProgram = <glow::Context as HasContext>::Program;
pub(crate) type GlRenderbuffer = <glow::Context as HasContext>::Renderbuffer;
pub(crate) type GlShader = <glow::Context as HasContext>::Shader;
pub(crate) type GlTexture = <glow::Context as HasContext>::Texture;
pub(crate) type GlSampler = <glow::Context as HasContext>::Sampler;
pub(crate) type GlTransformFeedback = <glow::Context as HasContext>::TransformFeedback;
pub(crate) type GlVertexArray = <glow::Context as HasContext>::VertexArray;
pub(crate) type GlUniformLocation = <glow::Context as HasContext>::UniformLocation;
pub(crate) type GlFence = <glow::Context as HasContext>::Fence;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GlObjectKind {
    Buffer,
    Framebuffer,
    Program,
    Renderbuffer,
    Shader,
    Texture,
    Sampler,
    TransformFeedback,
    VertexArray,
}

/// Something the registry can track. Equality must distinguish objects of different kinds
/// even when their GL names coincide.
pub trait TrackedObject: Copy + PartialEq {
    fn kind(&self) -> GlObjectKind;
}

/// A GL object name tagged with its kind.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum RawObject {
    Buffer(GlBuffer),
    Framebuffer(GlFramebuffer),
    Program(GlProgram),
    Renderbuffer(GlRenderbuffer),
    Shader(GlShader),
    Texture(GlTexture),
    Sampler(GlSampler),
    TransformFeedback(GlTransformFeedback),
    VertexArray(GlVertexArray),
}

impl TrackedObject for RawObject {
    fn kind(&self) -> GlObjectKind {
        match self {
            RawObject::Buffer(_) => GlObjectKind::Buffer,
            RawObject::Framebuffer(_) => GlObjectKind::Framebuffer,
            RawObject::Program(_) => GlObjectKind::Program,
            RawObject::Renderbuffer(_) => GlObjectKind::Renderbuffer,
            RawObject::Shader(_) => GlObjectKind::Shader,
            RawObject::Texture(_) => GlObjectKind::Texture,
            RawObject::Sampler(_) => GlObjectKind::Sampler,
            RawObject::TransformFeedback(_) => GlObjectKind::TransformFeedback,
            RawObject::VertexArray(_) => GlObjectKind::VertexArray,
        }
    }
}

/// Keeps every live GL object a context has handed out, so that whatever the caller never
/// deleted can be released when the context goes away.
pub struct ObjectRegistry<T> {
    live: Vec<T>,
}

impl<T: TrackedObject> ObjectRegistry<T> {
    pub fn new() -> Self {
        Self { live: vec![] }
    }

    pub fn register(&mut self, object: T) {
        self.live.push(object);
    }

    /// Forgets `object`. Returns false if it wasn't registered.
    pub fn unregister(&mut self, object: T) -> bool {
        match self.live.iter().position(|o| *o == object) {
            Some(index) => {
                self.live.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, object: T) -> bool {
        self.live.contains(&object)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn count(&self, kind: GlObjectKind) -> usize {
        self.live.iter().filter(|o| o.kind() == kind).count()
    }

    /// Hands back every live object in registration order, leaving the registry empty.
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.live)
    }
}

impl<T: TrackedObject> Default for ObjectRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! webgl_object {
    ($(#[$meta:meta])* $name:ident($raw:ty)) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq)]
        pub struct $name {
            pub(crate) raw: $raw,
            pub(crate) owner: Owner,
        }

        impl $name {
            /// Returns the underlying GL name, provided `owner` is the current generation of
            /// the context that created this object.
            pub(crate) fn raw_for(&self, owner: Owner) -> Result<$raw, WebGlError> {
                self.owner.check(owner, stringify!($name))?;
                Ok(self.raw)
            }
        }
    };
}

webgl_object!(WebGlBuffer(GlBuffer));
webgl_object!(WebGlFramebuffer(GlFramebuffer));
webgl_object!(WebGlProgram(GlProgram));
webgl_object!(WebGlRenderbuffer(GlRenderbuffer));
webgl_object!(WebGlShader(GlShader));
webgl_object!(WebGlTexture(GlTexture));
webgl_object!(WebGlSampler(GlSampler));
webgl_object!(WebGlTransformFeedback(GlTransformFeedback));
webgl_object!(WebGlVertexArrayObject(GlVertexArray));
webgl_object!(
    /// A fence. The raw value is an id into the context's sync table, not a GL pointer.
    WebGlSync(i32)
);

/// A uniform location within a linked program.
#[derive(Clone, Debug)]
pub struct WebGlUniformLocation {
    pub(crate) raw: GlUniformLocation,
    pub(crate) owner: Owner,
}

impl WebGlUniformLocation {
    pub(crate) fn raw_for(&self, owner: Owner) -> Result<&GlUniformLocation, WebGlError> {
        self.owner.check(owner, "WebGlUniformLocation")?;
        Ok(&self.raw)
    }
}

/// Converts an optional handle into an optional raw name, checking ownership.
macro_rules! raw_opt {
    ($handle:expr, $owner:expr) => {
        match $handle {
            Some(handle) => Some(handle.raw_for($owner)?),
            None => None,
        }
    };
}
pub(crate) use raw_opt;

/// Checks whether `handle` resolves on `context` to a live object GL also recognises.
macro_rules! is_object {
    ($context:expr, $handle:expr, $kind:ident, $gl_is:ident) => {
        match $handle.map(|h| h.raw_for($context.owner())) {
            Some(Ok(raw)) => {
                $context.is_live(RawObject::$kind(raw)) && unsafe { $context.inner().$gl_is(raw) }
            }
            _ => false,
        }
    };
}
pub(crate) use is_object;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq)]
    struct Fake(GlObjectKind, u32);

    impl TrackedObject for Fake {
        fn kind(&self) -> GlObjectKind {
            self.0
        }
    }

    #[test]
    fn same_name_different_kind_does_not_collide() {
        let mut registry = ObjectRegistry::new();
        registry.register(Fake(GlObjectKind::Buffer, 1));
        registry.register(Fake(GlObjectKind::Texture, 1));

        assert!(registry.unregister(Fake(GlObjectKind::Texture, 1)));
        assert!(registry.contains(Fake(GlObjectKind::Buffer, 1)));
        assert!(!registry.contains(Fake(GlObjectKind::Texture, 1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistering_unknown_object_is_harmless() {
        let mut registry = ObjectRegistry::new();
        registry.register(Fake(GlObjectKind::Shader, 3));
        assert!(!registry.unregister(Fake(GlObjectKind::Shader, 4)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn drain_returns_registration_order_and_empties_registry() {
        let mut registry = ObjectRegistry::new();
        registry.register(Fake(GlObjectKind::Program, 7));
        registry.register(Fake(GlObjectKind::Buffer, 2));
        registry.register(Fake(GlObjectKind::Shader, 5));

        let drained = registry.drain();
        assert_eq!(
            drained,
            vec![
                Fake(GlObjectKind::Program, 7),
                Fake(GlObjectKind::Buffer, 2),
                Fake(GlObjectKind::Shader, 5)
            ]
        );
        assert!(registry.is_empty());
        assert!(!registry.unregister(Fake(GlObjectKind::Program, 7)));

        registry.register(Fake(GlObjectKind::Buffer, 9));
        assert!(registry.unregister(Fake(GlObjectKind::Buffer, 9)));
    }

    #[test]
    fn count_by_kind() {
        let mut registry = ObjectRegistry::new();
        registry.register(Fake(GlObjectKind::Buffer, 1));
        registry.register(Fake(GlObjectKind::Buffer, 2));
        registry.register(Fake(GlObjectKind::Texture, 1));
        assert_eq!(registry.count(GlObjectKind::Buffer), 2);
        assert_eq!(registry.count(GlObjectKind::Framebuffer), 0);
    }

    #[test]
    fn handles_are_bound_to_their_context() {
        let ours = Owner { context: ContextId::new(), generation: 0 };
        let theirs = Owner { context: ContextId::new(), generation: 0 };
        let sync = WebGlSync { raw: 3, owner: ours };

        assert_eq!(sync.raw_for(ours).unwrap(), 3);
        assert!(matches!(sync.raw_for(theirs), Err(WebGlError::InvalidOperation(_))));
    }

    #[test]
    fn handles_from_before_destroy_are_stale() {
        let before = Owner { context: ContextId::new(), generation: 0 };
        let after = Owner { generation: 1, ..before };
        let sync = WebGlSync { raw: 3, owner: before };

        match sync.raw_for(after) {
            Err(WebGlError::InvalidOperation(message)) => {
                assert!(message.contains("destroyed"), "{}", message)
            }
            other => panic!("stale handle resolved: {:?}", other),
        }
        let fresh = WebGlSync { raw: 3, owner: after };
        assert_eq!(fresh.raw_for(after).unwrap(), 3);
    }
}
