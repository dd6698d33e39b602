use glow::HasContext;
use std::ffi::c_void;

use super::context::*;
use super::error::*;
use super::objects::*;
use super::pixels::check_clear_element;

impl WebGlRenderingContext {
    pub fn create_buffer(&self) -> Result<WebGlBuffer, WebGlError> {
        let raw = unsafe { self.inner().create_buffer() }
            .map_err(|e| WebGlError::CreateFailed(GlObjectKind::Buffer, e))?;
        self.track(RawObject::Buffer(raw));
        Ok(WebGlBuffer { raw, owner: self.owner() })
    }

    pub fn delete_buffer(&self, buffer: &WebGlBuffer) -> Result<(), WebGlError> {
        let raw = buffer.raw_for(self.owner())?;
        self.untrack(RawObject::Buffer(raw));
        unsafe { self.inner().delete_buffer(raw) };
        Ok(())
    }

    /// False until the buffer has been bound once, as in GL.
    pub fn is_buffer(&self, buffer: Option<&WebGlBuffer>) -> bool {
        is_object!(self, buffer, Buffer, is_buffer)
    }

    pub fn bind_buffer(&self, target: u32, buffer: Option<&WebGlBuffer>) -> Result<(), WebGlError> {
        let raw = raw_opt!(buffer, self.owner());
        unsafe { self.inner().bind_buffer(target, raw) };
        Ok(())
    }

    pub fn bind_buffer_base(
        &self,
        target: u32,
        index: u32,
        buffer: Option<&WebGlBuffer>,
    ) -> Result<(), WebGlError> {
        let raw = raw_opt!(buffer, self.owner());
        unsafe { self.inner().bind_buffer_base(target, index, raw) };
        Ok(())
    }

    pub fn bind_buffer_range(
        &self,
        target: u32,
        index: u32,
        buffer: Option<&WebGlBuffer>,
        offset: i32,
        size: i32,
    ) -> Result<(), WebGlError> {
        let raw = raw_opt!(buffer, self.owner());
        unsafe { self.inner().bind_buffer_range(target, index, raw, offset, size) };
        Ok(())
    }

    /// Allocates and fills the buffer bound to `target`.
    pub fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.inner().buffer_data_u8_slice(target, data, usage) }
    }

    /// Allocates `size` uninitialised bytes for the buffer bound to `target`.
    pub fn buffer_data_size(&self, target: u32, size: i32, usage: u32) -> Result<(), WebGlError> {
        if size < 0 {
            return Err(WebGlError::InvalidValue(format!("negative buffer size {}", size)));
        }
        unsafe { self.inner().buffer_data_size(target, size, usage) };
        Ok(())
    }

    /// Allocates immutable storage for the buffer bound to `target`. A `size` of 0 with
    /// `data` takes the size from `data` (GL 4.4+).
    pub fn buffer_storage(
        &self,
        target: u32,
        size: i32,
        data: Option<&[u8]>,
        flags: u32,
    ) -> Result<(), WebGlError> {
        let size = storage_size(size, data)?;
        unsafe { self.inner().buffer_storage(target, size, data, flags) };
        Ok(())
    }

    /// Fills the whole buffer bound to `target` with the element in `data`, or with zero
    /// for `None` (GL 4.3+).
    pub fn clear_buffer_data(
        &self,
        target: u32,
        internal_format: u32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) -> Result<(), WebGlError> {
        check_clear_element(data, format, ty, "clear_buffer_data")?;
        let data = data.map_or(std::ptr::null(), |d| d.as_ptr() as *const c_void);
        unsafe {
            self.entry_points().clear_buffer_data(target, internal_format, format, ty, data)
        }
    }

    /// Like `clear_buffer_data`, for `size` bytes starting at `offset`.
    #[allow(clippy::too_many_arguments)]
    pub fn clear_buffer_sub_data(
        &self,
        target: u32,
        internal_format: u32,
        offset: i32,
        size: i32,
        format: u32,
        ty: u32,
        data: Option<&[u8]>,
    ) -> Result<(), WebGlError> {
        if offset < 0 || size < 0 {
            return Err(WebGlError::InvalidValue(format!(
                "negative buffer range {}+{}",
                offset, size
            )));
        }
        check_clear_element(data, format, ty, "clear_buffer_sub_data")?;
        let data = data.map_or(std::ptr::null(), |d| d.as_ptr() as *const c_void);
        unsafe {
            self.entry_points().clear_buffer_sub_data(
                target,
                internal_format,
                offset as isize,
                size as isize,
                format,
                ty,
                data,
            )
        }
    }

    pub fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) -> Result<(), WebGlError> {
        if offset < 0 {
            return Err(WebGlError::InvalidValue(format!("negative offset {}", offset)));
        }
        unsafe { self.inner().buffer_sub_data_u8_slice(target, offset, data) };
        Ok(())
    }

    /// Reads `dst.len()` bytes starting at `offset` from the buffer bound to `target`.
    pub fn get_buffer_sub_data(
        &self,
        target: u32,
        offset: i32,
        dst: &mut [u8],
    ) -> Result<(), WebGlError> {
        if offset < 0 {
            return Err(WebGlError::InvalidValue(format!("negative offset {}", offset)));
        }
        unsafe { self.inner().get_buffer_sub_data(target, offset, dst) };
        Ok(())
    }

    pub fn copy_buffer_sub_data(
        &self,
        read_target: u32,
        write_target: u32,
        read_offset: i32,
        write_offset: i32,
        size: i32,
    ) {
        unsafe {
            self.inner().copy_buffer_sub_data(
                read_target,
                write_target,
                read_offset,
                write_offset,
                size,
            )
        }
    }

    pub fn get_buffer_parameter(&self, target: u32, pname: u32) -> i32 {
        unsafe { self.inner().get_buffer_parameter_i32(target, pname) }
    }

    pub fn create_framebuffer(&self) -> Result<WebGlFramebuffer, WebGlError> {
        let raw = unsafe { self.inner().create_framebuffer() }
            .map_err(|e| WebGlError::CreateFailed(GlObjectKind::Framebuffer, e))?;
        self.track(RawObject::Framebuffer(raw));
        Ok(WebGlFramebuffer { raw, owner: self.owner() })
    }

    pub fn delete_framebuffer(&self, framebuffer: &WebGlFramebuffer) -> Result<(), WebGlError> {
        let raw = framebuffer.raw_for(self.owner())?;
        self.untrack(RawObject::Framebuffer(raw));
        unsafe { self.inner().delete_framebuffer(raw) };
        Ok(())
    }

    pub fn is_framebuffer(&self, framebuffer: Option<&WebGlFramebuffer>) -> bool {
        is_object!(self, framebuffer, Framebuffer, is_framebuffer)
    }

    pub fn bind_framebuffer(
        &self,
        target: u32,
        framebuffer: Option<&WebGlFramebuffer>,
    ) -> Result<(), WebGlError> {
        let raw = raw_opt!(framebuffer, self.owner());
        unsafe { self.inner().bind_framebuffer(target, raw) };
        Ok(())
    }

    pub fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        textarget: u32,
        texture: Option<&WebGlTexture>,
        level: i32,
    ) -> Result<(), WebGlError> {
        let raw = raw_opt!(texture, self.owner());
        unsafe { self.inner().framebuffer_texture_2d(target, attachment, textarget, raw, level) };
        Ok(())
    }

    pub fn framebuffer_texture_layer(
        &self,
        target: u32,
        attachment: u32,
        texture: Option<&WebGlTexture>,
        level: i32,
        layer: i32,
    ) -> Result<(), WebGlError> {
        let raw = raw_opt!(texture, self.owner());
        unsafe { self.inner().framebuffer_texture_layer(target, attachment, raw, level, layer) };
        Ok(())
    }

    pub fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&WebGlRenderbuffer>,
    ) -> Result<(), WebGlError> {
        let raw = raw_opt!(renderbuffer, self.owner());
        unsafe {
            self.inner().framebuffer_renderbuffer(target, attachment, renderbuffer_target, raw)
        };
        Ok(())
    }

    pub fn get_framebuffer_attachment_parameter(
        &self,
        target: u32,
        attachment: u32,
        pname: u32,
    ) -> i32 {
        unsafe { self.inner().get_framebuffer_attachment_parameter_i32(target, attachment, pname) }
    }

    pub fn check_framebuffer_status(&self, target: u32) -> u32 {
        let status = unsafe { self.inner().check_framebuffer_status(target) };
        if status != glow::FRAMEBUFFER_COMPLETE {
            let reason = match status {
                glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "incomplete attachment",
                glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => "incomplete missing attachment",
                glow::FRAMEBUFFER_UNSUPPORTED => "unsupported",
                _ => "unknown reason",
            };
            log::debug!("Framebuffer not complete: {}", reason);
        }
        status
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blit_framebuffer(
        &self,
        src_x0: i32,
        src_y0: i32,
        src_x1: i32,
        src_y1: i32,
        dst_x0: i32,
        dst_y0: i32,
        dst_x1: i32,
        dst_y1: i32,
        mask: u32,
        filter: u32,
    ) {
        unsafe {
            self.inner().blit_framebuffer(
                src_x0, src_y0, src_x1, src_y1, dst_x0, dst_y0, dst_x1, dst_y1, mask, filter,
            )
        }
    }

    pub fn read_buffer(&self, src: u32) {
        unsafe { self.inner().read_buffer(src) }
    }

    pub fn draw_buffers(&self, buffers: &[u32]) {
        unsafe { self.inner().draw_buffers(buffers) }
    }

    pub fn create_renderbuffer(&self) -> Result<WebGlRenderbuffer, WebGlError> {
        let raw = unsafe { self.inner().create_renderbuffer() }
            .map_err(|e| WebGlError::CreateFailed(GlObjectKind::Renderbuffer, e))?;
        self.track(RawObject::Renderbuffer(raw));
        Ok(WebGlRenderbuffer { raw, owner: self.owner() })
    }

    pub fn delete_renderbuffer(&self, renderbuffer: &WebGlRenderbuffer) -> Result<(), WebGlError> {
        let raw = renderbuffer.raw_for(self.owner())?;
        self.untrack(RawObject::Renderbuffer(raw));
        unsafe { self.inner().delete_renderbuffer(raw) };
        Ok(())
    }

    pub fn is_renderbuffer(&self, renderbuffer: Option<&WebGlRenderbuffer>) -> bool {
        is_object!(self, renderbuffer, Renderbuffer, is_renderbuffer)
    }

    pub fn bind_renderbuffer(
        &self,
        target: u32,
        renderbuffer: Option<&WebGlRenderbuffer>,
    ) -> Result<(), WebGlError> {
        let raw = raw_opt!(renderbuffer, self.owner());
        unsafe { self.inner().bind_renderbuffer(target, raw) };
        Ok(())
    }

    pub fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32) {
        unsafe { self.inner().renderbuffer_storage(target, internal_format, width, height) }
    }

    pub fn get_renderbuffer_parameter(&self, target: u32, pname: u32) -> i32 {
        unsafe { self.inner().get_renderbuffer_parameter_i32(target, pname) }
    }

    pub fn create_sampler(&self) -> Result<WebGlSampler, WebGlError> {
        let raw = unsafe { self.inner().create_sampler() }
            .map_err(|e| WebGlError::CreateFailed(GlObjectKind::Sampler, e))?;
        self.track(RawObject::Sampler(raw));
        Ok(WebGlSampler { raw, owner: self.owner() })
    }

    pub fn delete_sampler(&self, sampler: &WebGlSampler) -> Result<(), WebGlError> {
        let raw = sampler.raw_for(self.owner())?;
        self.untrack(RawObject::Sampler(raw));
        unsafe { self.inner().delete_sampler(raw) };
        Ok(())
    }

    pub fn bind_sampler(&self, unit: u32, sampler: Option<&WebGlSampler>) -> Result<(), WebGlError> {
        let raw = raw_opt!(sampler, self.owner());
        unsafe { self.inner().bind_sampler(unit, raw) };
        Ok(())
    }

    pub fn sampler_parameteri(
        &self,
        sampler: &WebGlSampler,
        pname: u32,
        param: i32,
    ) -> Result<(), WebGlError> {
        let raw = sampler.raw_for(self.owner())?;
        unsafe { self.inner().sampler_parameter_i32(raw, pname, param) };
        Ok(())
    }

    pub fn sampler_parameterf(
        &self,
        sampler: &WebGlSampler,
        pname: u32,
        param: f32,
    ) -> Result<(), WebGlError> {
        let raw = sampler.raw_for(self.owner())?;
        unsafe { self.inner().sampler_parameter_f32(raw, pname, param) };
        Ok(())
    }

    pub fn create_transform_feedback(&self) -> Result<WebGlTransformFeedback, WebGlError> {
        let raw = unsafe { self.inner().create_transform_feedback() }
            .map_err(|e| WebGlError::CreateFailed(GlObjectKind::TransformFeedback, e))?;
        self.track(RawObject::TransformFeedback(raw));
        Ok(WebGlTransformFeedback { raw, owner: self.owner() })
    }

    pub fn delete_transform_feedback(
        &self,
        transform_feedback: &WebGlTransformFeedback,
    ) -> Result<(), WebGlError> {
        let raw = transform_feedback.raw_for(self.owner())?;
        self.untrack(RawObject::TransformFeedback(raw));
        unsafe { self.inner().delete_transform_feedback(raw) };
        Ok(())
    }

    pub fn bind_transform_feedback(
        &self,
        target: u32,
        transform_feedback: Option<&WebGlTransformFeedback>,
    ) -> Result<(), WebGlError> {
        let raw = raw_opt!(transform_feedback, self.owner());
        unsafe { self.inner().bind_transform_feedback(target, raw) };
        Ok(())
    }

    pub fn begin_transform_feedback(&self, primitive_mode: u32) {
        unsafe { self.inner().begin_transform_feedback(primitive_mode) }
    }

    pub fn end_transform_feedback(&self) {
        unsafe { self.inner().end_transform_feedback() }
    }

    /// Inserts a fence into the command stream and returns a handle for it.
    pub fn fence_sync(&self, condition: u32, flags: u32) -> Result<WebGlSync, WebGlError> {
        let fence = unsafe { self.inner().fence_sync(condition, flags) }
            .map_err(WebGlError::InvalidOperation)?;
        let id = self.state().syncs.register(fence);
        Ok(WebGlSync { raw: id, owner: self.owner() })
    }

    pub fn delete_sync(&self, sync: &WebGlSync) -> Result<(), WebGlError> {
        let id = sync.raw_for(self.owner())?;
        let fence = self.state().syncs.unregister(id).ok_or(WebGlError::UnknownSync(id))?;
        unsafe { self.inner().delete_sync(fence) };
        Ok(())
    }

    /// Supports `SYNC_STATUS`, the only parameter callers poll in practice.
    pub fn get_sync_parameter(&self, sync: &WebGlSync, pname: u32) -> Result<u32, WebGlError> {
        let id = sync.raw_for(self.owner())?;
        let fence = *self.state().syncs.get(id).ok_or(WebGlError::UnknownSync(id))?;
        match pname {
            glow::SYNC_STATUS => Ok(unsafe { self.inner().get_sync_status(fence) }),
            _ => Err(WebGlError::InvalidEnum(pname, "get_sync_parameter")),
        }
    }

    pub fn client_wait_sync(
        &self,
        sync: &WebGlSync,
        flags: u32,
        timeout: i32,
    ) -> Result<u32, WebGlError> {
        let id = sync.raw_for(self.owner())?;
        let fence = *self.state().syncs.get(id).ok_or(WebGlError::UnknownSync(id))?;
        Ok(unsafe { self.inner().client_wait_sync(fence, flags, timeout) })
    }
}

/// Resolves the byte size for `buffer_storage`, which must not exceed the data given.
fn storage_size(size: i32, data: Option<&[u8]>) -> Result<i32, WebGlError> {
    if size < 0 {
        return Err(WebGlError::InvalidValue(format!("negative buffer size {}", size)));
    }
    match data {
        Some(data) if size == 0 => i32::try_from(data.len())
            .map_err(|_| WebGlError::InvalidValue(format!("{} bytes is too large", data.len()))),
        Some(data) if size as usize > data.len() => Err(WebGlError::NotEnoughData("buffer_storage")),
        _ => Ok(size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_size_defaults_to_the_data() {
        assert_eq!(storage_size(0, Some(&[0; 12])), Ok(12));
        assert_eq!(storage_size(8, Some(&[0; 12])), Ok(8));
        assert_eq!(storage_size(64, None), Ok(64));
    }

    #[test]
    fn storage_size_never_reads_past_the_data() {
        assert_eq!(storage_size(16, Some(&[0; 12])), Err(WebGlError::NotEnoughData("buffer_storage")));
        assert!(matches!(storage_size(-1, None), Err(WebGlError::InvalidValue(_))));
    }
}
