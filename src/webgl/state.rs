use glow::HasContext;

use super::context::*;
use super::error::*;

/// Fixed-function state. These forward straight to GL; errors surface through `get_error`.
impl WebGlRenderingContext {
    pub fn enable(&self, cap: u32) {
        unsafe { self.inner().enable(cap) }
    }

    pub fn disable(&self, cap: u32) {
        unsafe { self.inner().disable(cap) }
    }

    pub fn is_enabled(&self, cap: u32) -> bool {
        unsafe { self.inner().is_enabled(cap) }
    }

    pub fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.inner().viewport(x, y, width, height) }
    }

    pub fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.inner().scissor(x, y, width, height) }
    }

    pub fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.inner().clear_color(red, green, blue, alpha) }
    }

    pub fn clear_depth(&self, depth: f32) {
        unsafe { self.inner().clear_depth_f32(depth) }
    }

    pub fn clear_stencil(&self, stencil: i32) {
        unsafe { self.inner().clear_stencil(stencil) }
    }

    pub fn clear(&self, mask: u32) {
        unsafe { self.inner().clear(mask) }
    }

    /// Clears one draw buffer of the bound framebuffer with the four floats starting at
    /// `src_offset`.
    pub fn clear_bufferfv(
        &self,
        buffer: u32,
        draw_buffer: i32,
        values: &[f32],
        src_offset: usize,
    ) -> Result<(), WebGlError> {
        let values = clear_values(values, src_offset, "clear_bufferfv")?;
        unsafe { self.inner().clear_buffer_f32_slice(buffer, draw_buffer as u32, values) };
        Ok(())
    }

    pub fn clear_bufferiv(
        &self,
        buffer: u32,
        draw_buffer: i32,
        values: &[i32],
        src_offset: usize,
    ) -> Result<(), WebGlError> {
        let values = clear_values(values, src_offset, "clear_bufferiv")?;
        unsafe { self.inner().clear_buffer_i32_slice(buffer, draw_buffer as u32, values) };
        Ok(())
    }

    pub fn clear_bufferuiv(
        &self,
        buffer: u32,
        draw_buffer: i32,
        values: &[u32],
        src_offset: usize,
    ) -> Result<(), WebGlError> {
        let values = clear_values(values, src_offset, "clear_bufferuiv")?;
        unsafe { self.inner().clear_buffer_u32_slice(buffer, draw_buffer as u32, values) };
        Ok(())
    }

    pub fn clear_bufferfi(&self, buffer: u32, draw_buffer: i32, depth: f32, stencil: i32) {
        unsafe {
            self.inner().clear_buffer_depth_stencil(buffer, draw_buffer as u32, depth, stencil)
        }
    }

    pub fn blend_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.inner().blend_color(red, green, blue, alpha) }
    }

    pub fn blend_equation(&self, mode: u32) {
        unsafe { self.inner().blend_equation(mode) }
    }

    pub fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32) {
        unsafe { self.inner().blend_equation_separate(mode_rgb, mode_alpha) }
    }

    pub fn blend_func(&self, sfactor: u32, dfactor: u32) {
        unsafe { self.inner().blend_func(sfactor, dfactor) }
    }

    pub fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        unsafe { self.inner().blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha) }
    }

    pub fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool) {
        unsafe { self.inner().color_mask(red, green, blue, alpha) }
    }

    pub fn cull_face(&self, mode: u32) {
        unsafe { self.inner().cull_face(mode) }
    }

    pub fn front_face(&self, mode: u32) {
        unsafe { self.inner().front_face(mode) }
    }

    pub fn depth_func(&self, func: u32) {
        unsafe { self.inner().depth_func(func) }
    }

    pub fn depth_mask(&self, flag: bool) {
        unsafe { self.inner().depth_mask(flag) }
    }

    pub fn depth_range(&self, z_near: f32, z_far: f32) {
        unsafe { self.inner().depth_range_f32(z_near, z_far) }
    }

    pub fn hint(&self, target: u32, mode: u32) {
        unsafe { self.inner().hint(target, mode) }
    }

    pub fn line_width(&self, width: f32) {
        unsafe { self.inner().line_width(width) }
    }

    pub fn polygon_offset(&self, factor: f32, units: f32) {
        unsafe { self.inner().polygon_offset(factor, units) }
    }

    pub fn sample_coverage(&self, value: f32, invert: bool) {
        unsafe { self.inner().sample_coverage(value, invert) }
    }

    pub fn stencil_func(&self, func: u32, reference: i32, mask: u32) {
        unsafe { self.inner().stencil_func(func, reference, mask) }
    }

    pub fn stencil_func_separate(&self, face: u32, func: u32, reference: i32, mask: u32) {
        unsafe { self.inner().stencil_func_separate(face, func, reference, mask) }
    }

    pub fn stencil_mask(&self, mask: u32) {
        unsafe { self.inner().stencil_mask(mask) }
    }

    pub fn stencil_mask_separate(&self, face: u32, mask: u32) {
        unsafe { self.inner().stencil_mask_separate(face, mask) }
    }

    pub fn stencil_op(&self, fail: u32, zfail: u32, zpass: u32) {
        unsafe { self.inner().stencil_op(fail, zfail, zpass) }
    }

    pub fn stencil_op_separate(&self, face: u32, fail: u32, zfail: u32, zpass: u32) {
        unsafe { self.inner().stencil_op_separate(face, fail, zfail, zpass) }
    }
}

/// GL reads four values from a clear call whatever the buffer.
fn clear_values<'a, T>(
    values: &'a [T],
    src_offset: usize,
    caller: &'static str,
) -> Result<&'a [T], WebGlError> {
    match values.get(src_offset..) {
        Some(rest) if rest.len() >= 4 => Ok(&rest[..4]),
        _ => Err(WebGlError::NotEnoughData(caller)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_values_need_four_after_the_offset() {
        assert_eq!(clear_values(&[0.5f32; 4], 0, "clear_bufferfv"), Ok(&[0.5f32; 4][..]));
        assert_eq!(clear_values(&[1, 2, 3, 4, 5, 6], 2, "clear_bufferiv"), Ok(&[3, 4, 5, 6][..]));
        assert_eq!(
            clear_values(&[1.0f32], 0, "clear_bufferfv"),
            Err(WebGlError::NotEnoughData("clear_bufferfv"))
        );
        assert_eq!(
            clear_values(&[1u32; 4], 1, "clear_bufferuiv"),
            Err(WebGlError::NotEnoughData("clear_bufferuiv"))
        );
        assert!(clear_values(&[1u32; 4], 9, "clear_bufferuiv").is_err());
    }
}
