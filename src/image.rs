//! Image decoding for texture uploads, exported as `Image`.

use cgmath::*;
use std::path::{Path, PathBuf};

use crate::webgl::{flip_rows, premultiply_rgba8};

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{width}x{height} RGBA image needs {expected} bytes, got {actual}")]
    SizeMismatch { width: u32, height: u32, expected: usize, actual: usize },
}

/// A decoded image: tightly packed RGBA8 rows, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    size: Vector2<u32>,
    pixels: Vec<u8>,
}

impl Image {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| ImageError::Load { path: path.to_path_buf(), source })?;
        log::debug!("Loaded image {}", path.display());
        Ok(Self::from_dynamic(image))
    }

    /// Decodes an encoded image (PNG or JPEG), guessing the format from its contents.
    pub fn from_memory(bytes: &[u8]) -> Result<Self, ImageError> {
        let image = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
        Ok(Self::from_dynamic(image))
    }

    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ImageError::SizeMismatch { width, height, expected, actual: pixels.len() });
        }
        Ok(Self { size: vec2(width, height), pixels })
    }

    fn from_dynamic(image: image::DynamicImage) -> Self {
        let image = image.to_rgba8();
        let size = vec2(image.width(), image.height());
        Self { size, pixels: image.into_raw() }
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn size(&self) -> Vector2<u32> {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Swaps the row order in place. GL's origin is the bottom left corner, so this
    /// converts between GL and image row order.
    pub fn flip_vertical(&mut self) {
        let row_len = self.size.x as usize * 4;
        flip_rows(&mut self.pixels, row_len, row_len, self.size.y as usize);
    }

    pub fn premultiply_alpha(&mut self) {
        premultiply_rgba8(&mut self.pixels);
    }

    /// Saves the image; the format is chosen from the extension of `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let path = path.as_ref();
        image::save_buffer(path, &self.pixels, self.size.x, self.size.y, image::ColorType::Rgba8)
            .map_err(|source| ImageError::Save { path: path.to_path_buf(), source })
    }
}

/// Loads images by `src`, resolving relative sources against an optional base directory.
#[derive(Clone, Debug, Default)]
pub struct ImageLoader {
    base_dir: Option<PathBuf>,
}

impl ImageLoader {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn resolve(&self, src: &str) -> PathBuf {
        let src = Path::new(src);
        match &self.base_dir {
            Some(base) if src.is_relative() => base.join(src),
            _ => src.to_path_buf(),
        }
    }

    pub fn load(&self, src: &str) -> Result<Image, ImageError> {
        Image::open(self.resolve(src))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_png() -> Vec<u8> {
        let mut buffer = image::RgbaImage::new(2, 2);
        buffer.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        buffer.put_pixel(1, 1, image::Rgba([0, 0, 255, 128]));
        let mut bytes = vec![];
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut bytes, image::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_from_memory() {
        let image = Image::from_memory(&encoded_png()).unwrap();
        assert_eq!(image.size(), vec2(2, 2));
        assert_eq!(&image.pixels()[..4], &[255, 0, 0, 255]);
        assert_eq!(&image.pixels()[12..], &[0, 0, 255, 128]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(Image::from_memory(b"not an image"), Err(ImageError::Decode(_))));
    }

    #[test]
    fn flip_and_premultiply() {
        let mut image = Image::from_memory(&encoded_png()).unwrap();
        image.flip_vertical();
        assert_eq!(&image.pixels()[4..8], &[0, 0, 255, 128]);
        image.premultiply_alpha();
        assert_eq!(&image.pixels()[4..8], &[0, 0, 128, 128]);
        assert_eq!(&image.pixels()[8..12], &[255, 0, 0, 255]);
    }

    #[test]
    fn raw_pixels_must_match_size() {
        assert!(Image::from_rgba8(2, 1, vec![0; 8]).is_ok());
        assert!(matches!(
            Image::from_rgba8(2, 2, vec![0; 8]),
            Err(ImageError::SizeMismatch { expected: 16, actual: 8, .. })
        ));
    }

    #[test]
    fn relative_sources_use_base_dir() {
        let loader = ImageLoader::new(Some(PathBuf::from("assets")));
        assert_eq!(loader.resolve("a.png"), Path::new("assets").join("a.png"));
        let absolute = std::env::temp_dir().join("b.png");
        assert_eq!(loader.resolve(absolute.to_str().unwrap()), absolute);
        assert_eq!(ImageLoader::default().resolve("a.png"), PathBuf::from("a.png"));
    }
}
