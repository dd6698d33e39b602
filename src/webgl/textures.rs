use glow::HasContext;
use std::ffi::c_void;

use super::context::*;
use super::error::*;
use super::objects::*;
use super::pixels::*;
use crate::image::Image;

impl WebGlRenderingContext {
    pub fn create_texture(&self) -> Result<WebGlTexture, WebGlError> {
        let raw = unsafe { self.inner().create_texture() }
            .map_err(|e| WebGlError::CreateFailed(GlObjectKind::Texture, e))?;
        self.track(RawObject::Texture(raw));
        Ok(WebGlTexture { raw, owner: self.owner() })
    }

    pub fn delete_texture(&self, texture: &WebGlTexture) -> Result<(), WebGlError> {
        let raw = texture.raw_for(self.owner())?;
        self.untrack(RawObject::Texture(raw));
        unsafe { self.inner().delete_texture(raw) };
        Ok(())
    }

    pub fn is_texture(&self, texture: Option<&WebGlTexture>) -> bool {
        is_object!(self, texture, Texture, is_texture)
    }

    pub fn bind_texture(&self, target: u32, texture: Option<&WebGlTexture>) -> Result<(), WebGlError> {
        let raw = raw_opt!(texture, self.owner());
        unsafe { self.inner().bind_texture(target, raw) };
        Ok(())
    }

    pub fn active_texture(&self, texture: u32) {
        unsafe { self.inner().active_texture(texture) }
    }

    /// Specifies a 2D image for the bound texture. `pixels` of `None` allocates storage
    /// without initialising it. The WebGL unpack flags are applied to `pixels` first.
    #[allow(clippy::too_many_arguments)]
    pub fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) -> Result<(), WebGlError> {
        let (w, h) = check_size(width, height)?;
        let store = self.pixel_store();
        let pixels = match pixels {
            Some(data) => {
                check_pixel_buffer(data.len(), w, h, format, ty, &store.unpack, "tex_image_2d")?;
                Some(store.prepare_upload(data, w, h, format, ty))
            }
            None => None,
        };
        unsafe {
            self.inner().tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                border,
                format,
                ty,
                glow::PixelUnpackData::Slice(pixels.as_deref()),
            )
        };
        Ok(())
    }

    /// Uploads a decoded image to the bound texture as RGBA8.
    pub fn tex_image_2d_with_image(
        &self,
        target: u32,
        level: i32,
        image: &Image,
    ) -> Result<(), WebGlError> {
        let size = image.size();
        self.tex_image_2d(
            target,
            level,
            glow::RGBA8 as i32,
            size.x as i32,
            size.y as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            Some(image.pixels()),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn tex_sub_image_2d(
        &self,
        target: u32,
        level: i32,
        xoffset: i32,
        yoffset: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: &[u8],
    ) -> Result<(), WebGlError> {
        let (w, h) = check_size(width, height)?;
        let store = self.pixel_store();
        check_pixel_buffer(pixels.len(), w, h, format, ty, &store.unpack, "tex_sub_image_2d")?;
        let pixels = store.prepare_upload(pixels, w, h, format, ty);
        unsafe {
            self.inner().tex_sub_image_2d(
                target,
                level,
                xoffset,
                yoffset,
                width,
                height,
                format,
                ty,
                glow::PixelUnpackData::Slice(Some(&pixels)),
            )
        };
        Ok(())
    }

    pub fn tex_storage_2d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) {
        unsafe { self.inner().tex_storage_2d(target, levels, internal_format, width, height) }
    }

    pub fn tex_storage_3d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    ) {
        unsafe {
            self.inner().tex_storage_3d(target, levels, internal_format, width, height, depth)
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn copy_tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        border: i32,
    ) {
        unsafe {
            self.inner()
                .copy_tex_image_2d(target, level, internal_format, x, y, width, height, border)
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn copy_tex_sub_image_2d(
        &self,
        target: u32,
        level: i32,
        xoffset: i32,
        yoffset: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        unsafe {
            self.inner()
                .copy_tex_sub_image_2d(target, level, xoffset, yoffset, x, y, width, height)
        }
    }

    pub fn tex_parameteri(&self, target: u32, pname: u32, param: i32) {
        unsafe { self.inner().tex_parameter_i32(target, pname, param) }
    }

    pub fn tex_parameterf(&self, target: u32, pname: u32, param: f32) {
        unsafe { self.inner().tex_parameter_f32(target, pname, param) }
    }

    pub fn get_tex_parameter(&self, target: u32, pname: u32) -> i32 {
        unsafe { self.inner().get_tex_parameter_i32(target, pname) }
    }

    pub fn generate_mipmap(&self, target: u32) {
        unsafe { self.inner().generate_mipmap(target) }
    }

    /// Binds a level of `texture` to an image unit for compute shaders (GL 4.2+).
    #[allow(clippy::too_many_arguments)]
    pub fn bind_image_texture(
        &self,
        unit: u32,
        texture: &WebGlTexture,
        level: i32,
        layered: bool,
        layer: i32,
        access: u32,
        format: u32,
    ) -> Result<(), WebGlError> {
        let raw = texture.raw_for(self.owner())?;
        unsafe {
            self.inner().bind_image_texture(unit, Some(raw), level, layered, layer, access, format)
        };
        Ok(())
    }

    /// Fills every texel of one level of `texture` with the pixel in `data`, or with zero
    /// for `None` (GL 4.4+).
    pub fn clear_tex_image(
        &self,
        texture: &WebGlTexture,
        level: i32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) -> Result<(), WebGlError> {
        let raw = texture.raw_for(self.owner())?;
        check_clear_element(data, format, ty, "clear_tex_image")?;
        let data = data.map_or(std::ptr::null(), |d| d.as_ptr() as *const c_void);
        unsafe { self.entry_points().clear_tex_image(raw.0.get(), level, format, ty, data) }
    }

    /// Copies a box of texels between two textures without going through a framebuffer
    /// (GL 4.3+).
    #[allow(clippy::too_many_arguments)]
    pub fn copy_image_sub_data(
        &self,
        src: &WebGlTexture,
        src_target: u32,
        src_level: i32,
        src_x: i32,
        src_y: i32,
        src_z: i32,
        dst: &WebGlTexture,
        dst_target: u32,
        dst_level: i32,
        dst_x: i32,
        dst_y: i32,
        dst_z: i32,
        width: i32,
        height: i32,
        depth: i32,
    ) -> Result<(), WebGlError> {
        let (src, dst) = (src.raw_for(self.owner())?, dst.raw_for(self.owner())?);
        if width < 0 || height < 0 || depth < 0 {
            return Err(WebGlError::InvalidValue(format!(
                "negative copy size {}x{}x{}",
                width, height, depth
            )));
        }
        unsafe {
            self.inner().copy_image_sub_data(
                src, src_target, src_level, src_x, src_y, src_z, dst, dst_target, dst_level,
                dst_x, dst_y, dst_z, width, height, depth,
            )
        };
        Ok(())
    }
}

pub(crate) fn check_size(width: i32, height: i32) -> Result<(u32, u32), WebGlError> {
    if width < 0 || height < 0 {
        return Err(WebGlError::InvalidValue(format!("negative size {}x{}", width, height)));
    }
    Ok((width as u32, height as u32))
}
