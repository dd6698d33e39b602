//! Client-side pixel store state and the byte layout of pixel rectangles.

use std::borrow::Cow;

use super::error::*;
use super::parameters::*;

/// Row layout for one direction of pixel transfer: `PACK_*` for reads, `UNPACK_*` for
/// uploads.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PixelLayout {
    pub alignment: u32,
    /// Pixels per row in client memory; 0 means the rectangle's width.
    pub row_length: u32,
    pub skip_rows: u32,
    pub skip_pixels: u32,
}

impl Default for PixelLayout {
    fn default() -> Self {
        Self { alignment: 4, row_length: 0, skip_rows: 0, skip_pixels: 0 }
    }
}

impl PixelLayout {
    /// Distance in bytes between the starts of consecutive rows of a `width` pixel wide
    /// rectangle. `None` if it doesn't fit in memory.
    pub fn row_stride(&self, width: u32, bytes_per_pixel: usize) -> Option<usize> {
        let pixels = if self.row_length > 0 { self.row_length } else { width };
        let row = (pixels as usize).checked_mul(bytes_per_pixel)?;
        let alignment = self.alignment.max(1) as usize;
        Some(row.checked_add(alignment - 1)? / alignment * alignment)
    }

    /// Offset of the first byte GL touches.
    pub fn skip_bytes(&self, stride: usize, bytes_per_pixel: usize) -> Option<usize> {
        (self.skip_rows as usize)
            .checked_mul(stride)?
            .checked_add((self.skip_pixels as usize).checked_mul(bytes_per_pixel)?)
    }

    /// Bytes GL touches for a `width` x `height` rectangle, skipped rows and pixels
    /// included. The last row isn't padded.
    pub fn byte_len(&self, width: u32, height: u32, bytes_per_pixel: usize) -> Option<usize> {
        if width == 0 || height == 0 {
            return Some(0);
        }
        let stride = self.row_stride(width, bytes_per_pixel)?;
        let last_row = (width as usize).checked_mul(bytes_per_pixel)?;
        stride
            .checked_mul(height as usize - 1)?
            .checked_add(last_row)?
            .checked_add(self.skip_bytes(stride, bytes_per_pixel)?)
    }
}

/// Pixel store parameters the context tracks itself.
///
/// The WebGL-only flags never reach the driver. Everything else is forwarded but also
/// kept here, so buffer sizes can be checked before GL reads or writes past a slice.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PixelStore {
    pub flip_y: bool,
    pub premultiply_alpha: bool,
    pub pack: PixelLayout,
    pub unpack: PixelLayout,
    // Only 3D transfers read these, and none are exposed yet.
    pub unpack_image_height: u32,
    pub unpack_skip_images: u32,
}

/// What `pixel_storei` should do after updating the tracked state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StoreAction {
    Forward,
    Consumed,
}

impl PixelStore {
    /// Updates the tracked state. Parameters the context doesn't track are rejected rather
    /// than forwarded, since they could change how many bytes GL touches.
    pub fn set(&mut self, pname: u32, param: i32) -> Result<StoreAction, WebGlError> {
        let target = match pname {
            UNPACK_FLIP_Y_WEBGL => {
                self.flip_y = param != 0;
                return Ok(StoreAction::Consumed);
            }
            UNPACK_PREMULTIPLY_ALPHA_WEBGL => {
                self.premultiply_alpha = param != 0;
                return Ok(StoreAction::Consumed);
            }
            glow::PACK_ALIGNMENT => {
                self.pack.alignment = check_alignment(param)?;
                return Ok(StoreAction::Forward);
            }
            glow::UNPACK_ALIGNMENT => {
                self.unpack.alignment = check_alignment(param)?;
                return Ok(StoreAction::Forward);
            }
            glow::PACK_ROW_LENGTH => &mut self.pack.row_length,
            glow::PACK_SKIP_ROWS => &mut self.pack.skip_rows,
            glow::PACK_SKIP_PIXELS => &mut self.pack.skip_pixels,
            glow::UNPACK_ROW_LENGTH => &mut self.unpack.row_length,
            glow::UNPACK_SKIP_ROWS => &mut self.unpack.skip_rows,
            glow::UNPACK_SKIP_PIXELS => &mut self.unpack.skip_pixels,
            glow::UNPACK_IMAGE_HEIGHT => &mut self.unpack_image_height,
            glow::UNPACK_SKIP_IMAGES => &mut self.unpack_skip_images,
            _ => return Err(WebGlError::InvalidEnum(pname, "pixel_storei")),
        };
        if param < 0 {
            return Err(WebGlError::InvalidValue(format!(
                "pixel store parameter 0x{:04x} can't be negative, got {}",
                pname, param
            )));
        }
        *target = param as u32;
        Ok(StoreAction::Forward)
    }

    /// Applies the WebGL unpack flags to an upload laid out by `self.unpack`. Flipping
    /// works on any format with a known pixel size; premultiplying only on
    /// `RGBA`/`UNSIGNED_BYTE`. Data GL would reject as too short passes through untouched.
    pub fn prepare_upload<'a>(
        &self,
        data: &'a [u8],
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
    ) -> Cow<'a, [u8]> {
        if !self.flip_y && !self.premultiply_alpha {
            return Cow::Borrowed(data);
        }
        let bpp = match bytes_per_pixel(format, ty) {
            Some(bpp) => bpp as usize,
            None => return Cow::Borrowed(data),
        };
        let layout = self.unpack;
        let (stride, start) = match layout.row_stride(width, bpp).and_then(|stride| {
            let start = layout.skip_bytes(stride, bpp)?;
            let len = layout.byte_len(width, height, bpp)?;
            (len <= data.len()).then(|| (stride, start))
        }) {
            Some(found) => found,
            None => return Cow::Borrowed(data),
        };
        let row_len = width as usize * bpp;
        // Rows overlap when ROW_LENGTH is shorter than the rectangle.
        if row_len > stride || height == 0 {
            return Cow::Borrowed(data);
        }

        let mut pixels = data.to_vec();
        let rect = &mut pixels[start..];
        if self.flip_y {
            flip_rows(rect, row_len, stride, height as usize);
        }
        if self.premultiply_alpha && format == glow::RGBA && ty == glow::UNSIGNED_BYTE {
            for row in 0..height as usize {
                let row_start = row * stride;
                premultiply_rgba8(&mut rect[row_start..row_start + row_len]);
            }
        }
        Cow::Owned(pixels)
    }
}

fn check_alignment(param: i32) -> Result<u32, WebGlError> {
    match param {
        1 | 2 | 4 | 8 => Ok(param as u32),
        _ => Err(WebGlError::InvalidValue(format!("alignment must be 1, 2, 4 or 8, got {}", param))),
    }
}

pub fn components(format: u32) -> Option<u32> {
    match format {
        glow::RED
        | glow::RED_INTEGER
        | glow::ALPHA
        | glow::LUMINANCE
        | glow::DEPTH_COMPONENT
        | glow::STENCIL_INDEX => Some(1),
        glow::RG | glow::RG_INTEGER | glow::LUMINANCE_ALPHA | glow::DEPTH_STENCIL => Some(2),
        glow::RGB | glow::RGB_INTEGER => Some(3),
        glow::RGBA | glow::RGBA_INTEGER => Some(4),
        _ => None,
    }
}

pub fn bytes_per_pixel(format: u32, ty: u32) -> Option<u32> {
    match ty {
        // Packed types describe a whole pixel.
        glow::UNSIGNED_SHORT_5_6_5 | glow::UNSIGNED_SHORT_4_4_4_4 | glow::UNSIGNED_SHORT_5_5_5_1 => {
            Some(2)
        }
        glow::UNSIGNED_INT_2_10_10_10_REV
        | glow::UNSIGNED_INT_10F_11F_11F_REV
        | glow::UNSIGNED_INT_5_9_9_9_REV
        | glow::UNSIGNED_INT_24_8 => Some(4),
        glow::UNSIGNED_BYTE | glow::BYTE => components(format),
        glow::UNSIGNED_SHORT | glow::SHORT | glow::HALF_FLOAT => components(format).map(|c| c * 2),
        glow::UNSIGNED_INT | glow::INT | glow::FLOAT => components(format).map(|c| c * 4),
        _ => None,
    }
}

/// Bytes GL touches when transferring a `width` x `height` rectangle of `format`/`ty`
/// pixels laid out by `layout`.
pub fn required_len(
    width: u32,
    height: u32,
    format: u32,
    ty: u32,
    layout: &PixelLayout,
    caller: &'static str,
) -> Result<usize, WebGlError> {
    let bpp = bytes_per_pixel(format, ty).ok_or(WebGlError::InvalidEnum(format, caller))?;
    layout.byte_len(width, height, bpp as usize).ok_or_else(|| {
        WebGlError::InvalidValue(format!("{}: {}x{} rectangle is too large", caller, width, height))
    })
}

/// Checks a caller buffer against `required_len`.
pub(crate) fn check_pixel_buffer(
    len: usize,
    width: u32,
    height: u32,
    format: u32,
    ty: u32,
    layout: &PixelLayout,
    caller: &'static str,
) -> Result<(), WebGlError> {
    let needed = required_len(width, height, format, ty, layout, caller)?;
    if len < needed {
        return Err(WebGlError::InvalidOperation(format!(
            "{} needs {} bytes, got {}",
            caller, needed, len
        )));
    }
    Ok(())
}

/// Checks the single element a `clear_*` call reads: one pixel of `format`/`ty`. `None`
/// clears to zero.
pub(crate) fn check_clear_element(
    data: Option<&[u8]>,
    format: u32,
    ty: u32,
    caller: &'static str,
) -> Result<(), WebGlError> {
    let bpp = bytes_per_pixel(format, ty).ok_or(WebGlError::InvalidEnum(format, caller))?;
    match data {
        Some(data) if data.len() < bpp as usize => Err(WebGlError::NotEnoughData(caller)),
        _ => Ok(()),
    }
}

/// Reverses the order of `height` rows, each `row_len` bytes long and `stride` bytes apart.
pub fn flip_rows(data: &mut [u8], row_len: usize, stride: usize, height: usize) {
    for top in 0..height / 2 {
        let bottom = height - 1 - top;
        let (head, tail) = data.split_at_mut(bottom * stride);
        head[top * stride..top * stride + row_len].swap_with_slice(&mut tail[..row_len]);
    }
}

pub fn premultiply_rgba8(data: &mut [u8]) {
    for pixel in data.chunks_exact_mut(4) {
        let alpha = pixel[3] as u32;
        for channel in &mut pixel[..3] {
            *channel = ((*channel as u32 * alpha + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight(alignment: u32) -> PixelLayout {
        PixelLayout { alignment, ..Default::default() }
    }

    #[test]
    fn webgl_flags_are_consumed() {
        let mut store = PixelStore::default();
        assert_eq!(store.set(UNPACK_FLIP_Y_WEBGL, 1), Ok(StoreAction::Consumed));
        assert_eq!(store.set(UNPACK_PREMULTIPLY_ALPHA_WEBGL, 1), Ok(StoreAction::Consumed));
        assert!(store.flip_y && store.premultiply_alpha);
        assert_eq!(store.set(glow::UNPACK_ALIGNMENT, 1), Ok(StoreAction::Forward));
        assert_eq!(store.unpack.alignment, 1);
    }

    #[test]
    fn bad_alignment_is_rejected() {
        let mut store = PixelStore::default();
        assert!(matches!(store.set(glow::PACK_ALIGNMENT, 3), Err(WebGlError::InvalidValue(_))));
        assert_eq!(store.pack.alignment, 4);
    }

    #[test]
    fn row_length_and_skips_are_tracked() {
        let mut store = PixelStore::default();
        assert_eq!(store.set(glow::PACK_ROW_LENGTH, 100), Ok(StoreAction::Forward));
        assert_eq!(store.set(glow::UNPACK_SKIP_ROWS, 2), Ok(StoreAction::Forward));
        assert_eq!(store.set(glow::UNPACK_SKIP_PIXELS, 3), Ok(StoreAction::Forward));
        assert_eq!(store.set(glow::UNPACK_IMAGE_HEIGHT, 8), Ok(StoreAction::Forward));
        assert_eq!(store.pack.row_length, 100);
        assert_eq!((store.unpack.skip_rows, store.unpack.skip_pixels), (2, 3));
        assert_eq!(store.unpack_image_height, 8);

        assert!(matches!(store.set(glow::UNPACK_ROW_LENGTH, -1), Err(WebGlError::InvalidValue(_))));
        assert_eq!(store.unpack.row_length, 0);
    }

    #[test]
    fn untracked_parameters_are_rejected() {
        let mut store = PixelStore::default();
        assert_eq!(
            store.set(glow::UNPACK_SWAP_BYTES, 1),
            Err(WebGlError::InvalidEnum(glow::UNPACK_SWAP_BYTES, "pixel_storei"))
        );
    }

    #[test]
    fn pack_row_length_grows_the_read_size() {
        let mut store = PixelStore::default();
        store.set(glow::PACK_ROW_LENGTH, 100).unwrap();

        // GL writes one full 400-byte row, then the 4 bytes of the second.
        let needed =
            required_len(1, 2, glow::RGBA, glow::UNSIGNED_BYTE, &store.pack, "read_pixels");
        assert_eq!(needed, Ok(404));
        assert!(matches!(
            check_pixel_buffer(8, 1, 2, glow::RGBA, glow::UNSIGNED_BYTE, &store.pack, "read_pixels"),
            Err(WebGlError::InvalidOperation(_))
        ));
    }

    #[test]
    fn skips_are_part_of_the_size() {
        let layout = PixelLayout { skip_rows: 1, skip_pixels: 2, ..tight(1) };
        // One skipped 3-byte RGB row, two skipped pixels, then two 3-byte rows.
        assert_eq!(required_len(1, 2, glow::RGB, glow::UNSIGNED_BYTE, &layout, "t"), Ok(3 + 6 + 6));
    }

    #[test]
    fn rows_are_padded_to_alignment_except_the_last() {
        // 3 RGB pixels = 9 bytes, padded to 12.
        assert_eq!(tight(4).row_stride(3, 3), Some(12));
        assert_eq!(tight(4).byte_len(3, 2, 3), Some(12 + 9));
        assert_eq!(tight(1).byte_len(3, 2, 3), Some(18));
        assert_eq!(tight(4).byte_len(0, 5, 4), Some(0));
    }

    #[test]
    fn required_len_knows_formats() {
        let layout = PixelLayout::default();
        assert_eq!(required_len(2, 2, glow::RGBA, glow::UNSIGNED_BYTE, &layout, "t"), Ok(16));
        assert_eq!(required_len(2, 1, glow::RGBA, glow::FLOAT, &layout, "t"), Ok(32));
        assert_eq!(required_len(2, 1, glow::RGB, glow::UNSIGNED_SHORT_5_6_5, &layout, "t"), Ok(4));
        assert!(required_len(2, 1, 0x1234, glow::UNSIGNED_BYTE, &layout, "t").is_err());
    }

    #[test]
    fn huge_rectangles_do_not_wrap() {
        let layout = PixelLayout::default();
        let wide = required_len(
            i32::MAX as u32,
            1,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            &layout,
            "tex_image_2d",
        );
        if cfg!(target_pointer_width = "64") {
            assert_eq!(wide, Ok(i32::MAX as usize * 4));
        } else {
            assert!(matches!(wide, Err(WebGlError::InvalidValue(_))));
        }
        assert!(matches!(
            required_len(u32::MAX, u32::MAX, glow::RGBA, glow::FLOAT, &layout, "tex_image_2d"),
            Err(WebGlError::InvalidValue(_))
        ));
    }

    #[test]
    fn clear_element_is_one_pixel() {
        assert!(check_clear_element(Some(&[0; 4]), glow::RGBA, glow::UNSIGNED_BYTE, "t").is_ok());
        assert!(check_clear_element(None, glow::RGBA, glow::FLOAT, "t").is_ok());
        assert_eq!(
            check_clear_element(Some(&[0; 8]), glow::RGBA, glow::FLOAT, "clear_tex_image"),
            Err(WebGlError::NotEnoughData("clear_tex_image"))
        );
        assert_eq!(
            check_clear_element(None, 0x1234, glow::FLOAT, "clear_buffer_data"),
            Err(WebGlError::InvalidEnum(0x1234, "clear_buffer_data"))
        );
    }

    #[test]
    fn flip_rows_respects_stride() {
        // Two rows of one RGB pixel with 4-byte alignment; padding byte stays put.
        let mut data = vec![1, 2, 3, 0, 4, 5, 6];
        flip_rows(&mut data, 3, 4, 2);
        assert_eq!(data, vec![4, 5, 6, 0, 1, 2, 3]);
    }

    #[test]
    fn flip_rows_leaves_middle_row() {
        let mut data = vec![1, 2, 3];
        flip_rows(&mut data, 1, 1, 3);
        assert_eq!(data, vec![3, 2, 1]);
    }

    #[test]
    fn premultiply_scales_color_by_alpha() {
        let mut data = vec![255, 128, 0, 128, 10, 20, 30, 255, 200, 200, 200, 0];
        premultiply_rgba8(&mut data);
        assert_eq!(data, vec![128, 64, 0, 128, 10, 20, 30, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn upload_untouched_without_flags() {
        let store = PixelStore::default();
        let data = [1u8, 2, 3, 4];
        assert!(matches!(
            store.prepare_upload(&data, 1, 1, glow::RGBA, glow::UNSIGNED_BYTE),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn upload_flips_and_premultiplies() {
        let store = PixelStore { flip_y: true, premultiply_alpha: true, ..Default::default() };
        let data = [255, 255, 255, 0, 100, 100, 100, 255];
        let prepared = store.prepare_upload(&data, 1, 2, glow::RGBA, glow::UNSIGNED_BYTE);
        assert_eq!(&*prepared, &[100, 100, 100, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn flip_applies_to_other_formats_but_premultiply_does_not() {
        let store = PixelStore {
            flip_y: true,
            premultiply_alpha: true,
            unpack: tight(1),
            ..Default::default()
        };
        let data = [10, 0, 20, 0];
        let prepared = store.prepare_upload(&data, 1, 2, glow::RG, glow::UNSIGNED_BYTE);
        assert_eq!(&*prepared, &[20, 0, 10, 0]);
    }

    #[test]
    fn flip_starts_after_skipped_rows() {
        let store = PixelStore {
            flip_y: true,
            unpack: PixelLayout { skip_rows: 1, ..tight(1) },
            ..Default::default()
        };
        let data = [9, 1, 2];
        let prepared = store.prepare_upload(&data, 1, 2, glow::RED, glow::UNSIGNED_BYTE);
        assert_eq!(&*prepared, &[9, 2, 1]);
    }

    #[test]
    fn short_upload_is_left_for_gl_to_reject() {
        let store = PixelStore { flip_y: true, ..Default::default() };
        let data = [0u8; 3];
        assert!(matches!(
            store.prepare_upload(&data, 1, 1, glow::RGBA, glow::UNSIGNED_BYTE),
            Cow::Borrowed(_)
        ));
    }
}
