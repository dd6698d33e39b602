use super::objects::GlObjectKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WebGlError {
    #[error("failed to create {0:?}: {1}")]
    CreateFailed(GlObjectKind, String),
    #[error("invalid enum 0x{0:04x} passed to {1}")]
    InvalidEnum(u32, &'static str),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Not enough data for {0}")]
    NotEnoughData(&'static str),
    #[error("{0} is not available on this driver")]
    Unavailable(&'static str),
    #[error("unknown sync object {0}")]
    UnknownSync(i32),
    #[error("OpenGL error 0x{0:04x}")]
    Gl(u32),
}
