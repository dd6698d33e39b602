use cgmath::*;
use std::fs;
use std::path::*;

use crate::error::Result;
use crate::image::Image;
use crate::webgl::{PixelLayout, WebGlRenderingContext};

/// Reads the `size` rectangle at the origin of the current read framebuffer.
pub fn capture(context: &WebGlRenderingContext, size: Vector2<u32>) -> Result<Image> {
    let mut pixels = vec![0; size.x as usize * size.y as usize * 4];

    // Tightly packed RGBA rows are always 4-aligned.
    let saved = context.pixel_store().pack;
    set_pack_layout(context, &PixelLayout::default())?;
    let read = context.read_pixels(
        0,
        0,
        size.x as i32,
        size.y as i32,
        glow::RGBA,
        glow::UNSIGNED_BYTE,
        &mut pixels,
    );
    set_pack_layout(context, &saved)?;
    read?;

    let mut image = Image::from_rgba8(size.x, size.y, pixels)?;
    image.flip_vertical();
    Ok(image)
}

fn set_pack_layout(context: &WebGlRenderingContext, layout: &PixelLayout) -> Result<()> {
    for (pname, value) in pack_parameters(layout) {
        context.pixel_storei(pname, value as i32)?;
    }
    Ok(())
}

fn pack_parameters(layout: &PixelLayout) -> [(u32, u32); 4] {
    [
        (glow::PACK_ALIGNMENT, layout.alignment),
        (glow::PACK_ROW_LENGTH, layout.row_length),
        (glow::PACK_SKIP_ROWS, layout.skip_rows),
        (glow::PACK_SKIP_PIXELS, layout.skip_pixels),
    ]
}

/// Default location for a screenshot taken at the current local time.
pub fn default_screenshot_path() -> PathBuf {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    let stamp = now
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string());
    Path::new("screenshots").join(format!("screenshot-{}.png", stamp))
}

/// Captures the framebuffer and saves it as an image, returning the path written.
pub fn save_screenshot(
    context: &WebGlRenderingContext,
    size: Vector2<u32>,
    path: Option<PathBuf>,
) -> Result<PathBuf> {
    let path = path.unwrap_or_else(default_screenshot_path);
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !dir.is_dir() {
            fs::create_dir_all(dir).map_err(|err| crate::image::ImageError::Save {
                path: path.clone(),
                source: image::ImageError::IoError(err),
            })?;
        }
    }
    capture(context, size)?.save(&path)?;
    log::info!("Saved screenshot to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webgl::PixelStore;

    #[test]
    fn pack_parameters_restore_a_layout() {
        let layout = PixelLayout { alignment: 8, row_length: 100, skip_rows: 2, skip_pixels: 3 };
        let mut store = PixelStore::default();
        for (pname, value) in pack_parameters(&layout) {
            store.set(pname, value as i32).unwrap();
        }
        assert_eq!(store.pack, layout);

        for (pname, value) in pack_parameters(&PixelLayout::default()) {
            store.set(pname, value as i32).unwrap();
        }
        assert_eq!(store.pack, PixelLayout::default());
    }

    #[test]
    fn default_path_is_a_png_in_screenshots() {
        let path = default_screenshot_path();
        assert_eq!(path.parent(), Some(Path::new("screenshots")));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("screenshot-"));
        assert!(name.ends_with(".png"));
    }
}
