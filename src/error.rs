use crate::image::ImageError;
use crate::platform::PlatformError;
use crate::webgl::WebGlError;

/// Any error produced while composing or using the bindings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("webgl: {0}")]
    WebGl(#[from] WebGlError),
    #[error("image: {0}")]
    Image(#[from] ImageError),
    #[error("platform: {0}")]
    Platform(#[from] PlatformError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
