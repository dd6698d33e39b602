use glow::HasContext;
use std::ffi::c_void;

use super::context::*;
use super::error::*;
use super::objects::*;
use super::parameters::Parameter;
use super::pixels::*;
use super::textures::check_size;

/// How `get_vertex_attrib` shapes the value of each parameter it answers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VertexAttribKind {
    Bool,
    Int,
    Float4,
}

impl VertexAttribKind {
    pub fn of(pname: u32) -> Option<Self> {
        match pname {
            glow::VERTEX_ATTRIB_ARRAY_ENABLED
            | glow::VERTEX_ATTRIB_ARRAY_NORMALIZED
            | glow::VERTEX_ATTRIB_ARRAY_INTEGER => Some(VertexAttribKind::Bool),
            glow::VERTEX_ATTRIB_ARRAY_SIZE
            | glow::VERTEX_ATTRIB_ARRAY_STRIDE
            | glow::VERTEX_ATTRIB_ARRAY_TYPE
            | glow::VERTEX_ATTRIB_ARRAY_DIVISOR
            | glow::VERTEX_ATTRIB_ARRAY_BUFFER_BINDING => Some(VertexAttribKind::Int),
            glow::CURRENT_VERTEX_ATTRIB => Some(VertexAttribKind::Float4),
            _ => None,
        }
    }

    /// Shapes the floats GL returned. Integer state reads back exactly through floats,
    /// since enums, sizes and names all stay below 2^24.
    pub fn shape(self, values: [f32; 4]) -> Parameter {
        match self {
            VertexAttribKind::Bool => Parameter::Bool(values[0] != 0.0),
            VertexAttribKind::Int => Parameter::Int(values[0] as i32),
            VertexAttribKind::Float4 => Parameter::Float4(values),
        }
    }
}

impl WebGlRenderingContext {
    pub fn create_vertex_array(&self) -> Result<WebGlVertexArrayObject, WebGlError> {
        let raw = unsafe { self.inner().create_vertex_array() }
            .map_err(|e| WebGlError::CreateFailed(GlObjectKind::VertexArray, e))?;
        self.track(RawObject::VertexArray(raw));
        Ok(WebGlVertexArrayObject { raw, owner: self.owner() })
    }

    pub fn delete_vertex_array(&self, vertex_array: &WebGlVertexArrayObject) -> Result<(), WebGlError> {
        let raw = vertex_array.raw_for(self.owner())?;
        self.untrack(RawObject::VertexArray(raw));
        unsafe { self.inner().delete_vertex_array(raw) };
        Ok(())
    }

    /// Binds `vertex_array`, or the context's default vertex array for `None`.
    pub fn bind_vertex_array(
        &self,
        vertex_array: Option<&WebGlVertexArrayObject>,
    ) -> Result<(), WebGlError> {
        let raw = match vertex_array {
            Some(vertex_array) => Some(vertex_array.raw_for(self.owner())?),
            None => self.state().default_vertex_array,
        };
        unsafe { self.inner().bind_vertex_array(raw) };
        Ok(())
    }

    pub fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.inner().enable_vertex_attrib_array(index) }
    }

    pub fn disable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.inner().disable_vertex_attrib_array(index) }
    }

    pub fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) -> Result<(), WebGlError> {
        check_attrib_layout(size, stride, offset)?;
        unsafe { self.inner().vertex_attrib_pointer_f32(index, size, ty, normalized, stride, offset) };
        Ok(())
    }

    pub fn vertex_attrib_i_pointer(
        &self,
        index: u32,
        size: i32,
        ty: u32,
        stride: i32,
        offset: i32,
    ) -> Result<(), WebGlError> {
        check_attrib_layout(size, stride, offset)?;
        unsafe { self.inner().vertex_attrib_pointer_i32(index, size, ty, stride, offset) };
        Ok(())
    }

    /// Queries the state of vertex attribute `index`. `VERTEX_ATTRIB_ARRAY_BUFFER_BINDING`
    /// answers with the bound buffer's GL name.
    pub fn get_vertex_attrib(&self, index: u32, pname: u32) -> Result<Parameter, WebGlError> {
        let kind =
            VertexAttribKind::of(pname).ok_or(WebGlError::InvalidEnum(pname, "get_vertex_attrib"))?;
        let mut values = [0.0; 4];
        unsafe { self.inner().get_vertex_attrib_parameter_f32_slice(index, pname, &mut values) };
        Ok(kind.shape(values))
    }

    /// Byte offset given to `vertex_attrib_pointer` for attribute `index`. `pname` must be
    /// `VERTEX_ATTRIB_ARRAY_POINTER`.
    pub fn get_vertex_attrib_offset(&self, index: u32, pname: u32) -> Result<usize, WebGlError> {
        if pname != glow::VERTEX_ATTRIB_ARRAY_POINTER {
            return Err(WebGlError::InvalidEnum(pname, "get_vertex_attrib_offset"));
        }
        let mut pointer: *mut c_void = std::ptr::null_mut();
        unsafe { self.entry_points().get_vertex_attrib_pointer(index, pname, &mut pointer)? };
        Ok(pointer as usize)
    }

    pub fn vertex_attrib_divisor(&self, index: u32, divisor: u32) {
        unsafe { self.inner().vertex_attrib_divisor(index, divisor) }
    }

    pub fn vertex_attrib_1f(&self, index: u32, x: f32) {
        unsafe { self.inner().vertex_attrib_1_f32(index, x) }
    }

    pub fn vertex_attrib_2f(&self, index: u32, x: f32, y: f32) {
        unsafe { self.inner().vertex_attrib_2_f32(index, x, y) }
    }

    pub fn vertex_attrib_3f(&self, index: u32, x: f32, y: f32, z: f32) {
        unsafe { self.inner().vertex_attrib_3_f32(index, x, y, z) }
    }

    pub fn vertex_attrib_4f(&self, index: u32, x: f32, y: f32, z: f32, w: f32) {
        unsafe { self.inner().vertex_attrib_4_f32(index, x, y, z, w) }
    }

    pub fn vertex_attrib_1fv(&self, index: u32, values: &[f32]) -> Result<(), WebGlError> {
        let v = attrib_values::<1>(values, "vertex_attrib_1fv")?;
        self.vertex_attrib_1f(index, v[0]);
        Ok(())
    }

    pub fn vertex_attrib_2fv(&self, index: u32, values: &[f32]) -> Result<(), WebGlError> {
        let v = attrib_values::<2>(values, "vertex_attrib_2fv")?;
        self.vertex_attrib_2f(index, v[0], v[1]);
        Ok(())
    }

    pub fn vertex_attrib_3fv(&self, index: u32, values: &[f32]) -> Result<(), WebGlError> {
        let v = attrib_values::<3>(values, "vertex_attrib_3fv")?;
        self.vertex_attrib_3f(index, v[0], v[1], v[2]);
        Ok(())
    }

    pub fn vertex_attrib_4fv(&self, index: u32, values: &[f32]) -> Result<(), WebGlError> {
        let v = attrib_values::<4>(values, "vertex_attrib_4fv")?;
        self.vertex_attrib_4f(index, v[0], v[1], v[2], v[3]);
        Ok(())
    }

    pub fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { self.inner().draw_arrays(mode, first, count) }
    }

    pub fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instance_count: i32) {
        unsafe { self.inner().draw_arrays_instanced(mode, first, count, instance_count) }
    }

    /// `offset` is a byte offset into the bound element array buffer.
    pub fn draw_elements(&self, mode: u32, count: i32, ty: u32, offset: i32) {
        unsafe { self.inner().draw_elements(mode, count, ty, offset) }
    }

    pub fn draw_elements_instanced(
        &self,
        mode: u32,
        count: i32,
        ty: u32,
        offset: i32,
        instance_count: i32,
    ) {
        unsafe { self.inner().draw_elements_instanced(mode, count, ty, offset, instance_count) }
    }

    /// Runs the bound compute program (GL 4.3+).
    pub fn dispatch_compute(&self, groups_x: u32, groups_y: u32, groups_z: u32) {
        unsafe { self.inner().dispatch_compute(groups_x, groups_y, groups_z) }
    }

    /// Runs the bound compute program with a work group size chosen here rather than in
    /// the shader (`ARB_compute_variable_group_size`).
    pub fn dispatch_compute_group_size(
        &self,
        groups_x: u32,
        groups_y: u32,
        groups_z: u32,
        size_x: u32,
        size_y: u32,
        size_z: u32,
    ) -> Result<(), WebGlError> {
        unsafe {
            self.entry_points()
                .dispatch_compute_group_size(groups_x, groups_y, groups_z, size_x, size_y, size_z)
        }
    }

    pub fn memory_barrier(&self, barriers: u32) {
        unsafe { self.inner().memory_barrier(barriers) }
    }

    /// Reads a rectangle of the read framebuffer into `dst`, which must be large enough for
    /// the rectangle under the current `PACK_*` layout.
    #[allow(clippy::too_many_arguments)]
    pub fn read_pixels(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        dst: &mut [u8],
    ) -> Result<(), WebGlError> {
        let (w, h) = check_size(width, height)?;
        let layout = self.pixel_store().pack;
        check_pixel_buffer(dst.len(), w, h, format, ty, &layout, "read_pixels")?;
        unsafe {
            self.inner().read_pixels(
                x,
                y,
                width,
                height,
                format,
                ty,
                glow::PixelPackData::Slice(Some(dst)),
            )
        };
        Ok(())
    }
}

fn check_attrib_layout(size: i32, stride: i32, offset: i32) -> Result<(), WebGlError> {
    if !(1..=4).contains(&size) {
        return Err(WebGlError::InvalidValue(format!("attribute size {} not in 1..=4", size)));
    }
    if !(0..=255).contains(&stride) {
        return Err(WebGlError::InvalidValue(format!("stride {} not in 0..=255", stride)));
    }
    if offset < 0 {
        return Err(WebGlError::InvalidValue(format!("negative offset {}", offset)));
    }
    Ok(())
}

fn attrib_values<const N: usize>(
    values: &[f32],
    caller: &'static str,
) -> Result<[f32; N], WebGlError> {
    if values.len() < N {
        return Err(WebGlError::NotEnoughData(caller));
    }
    let mut out = [0.0; N];
    out.copy_from_slice(&values[..N]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrib_layout_limits() {
        assert!(check_attrib_layout(4, 16, 0).is_ok());
        assert!(check_attrib_layout(0, 0, 0).is_err());
        assert!(check_attrib_layout(5, 0, 0).is_err());
        assert!(check_attrib_layout(3, 256, 0).is_err());
        assert!(check_attrib_layout(3, 12, -4).is_err());
    }

    #[test]
    fn vertex_attrib_parameters_are_classified() {
        for pname in [
            glow::VERTEX_ATTRIB_ARRAY_ENABLED,
            glow::VERTEX_ATTRIB_ARRAY_NORMALIZED,
            glow::VERTEX_ATTRIB_ARRAY_INTEGER,
        ] {
            assert_eq!(VertexAttribKind::of(pname), Some(VertexAttribKind::Bool));
        }
        for pname in [
            glow::VERTEX_ATTRIB_ARRAY_SIZE,
            glow::VERTEX_ATTRIB_ARRAY_STRIDE,
            glow::VERTEX_ATTRIB_ARRAY_TYPE,
            glow::VERTEX_ATTRIB_ARRAY_DIVISOR,
            glow::VERTEX_ATTRIB_ARRAY_BUFFER_BINDING,
        ] {
            assert_eq!(VertexAttribKind::of(pname), Some(VertexAttribKind::Int));
        }
        assert_eq!(VertexAttribKind::of(glow::CURRENT_VERTEX_ATTRIB), Some(VertexAttribKind::Float4));
        assert_eq!(VertexAttribKind::of(glow::VERTEX_ATTRIB_ARRAY_POINTER), None);
    }

    #[test]
    fn vertex_attrib_values_are_shaped() {
        let ty = glow::FLOAT as f32;
        assert_eq!(VertexAttribKind::Int.shape([ty, 0.0, 0.0, 0.0]), Parameter::Int(glow::FLOAT as i32));
        assert_eq!(VertexAttribKind::Bool.shape([1.0, 0.0, 0.0, 0.0]), Parameter::Bool(true));
        assert_eq!(
            VertexAttribKind::Float4.shape([0.0, 0.5, 1.0, 1.0]),
            Parameter::Float4([0.0, 0.5, 1.0, 1.0])
        );
    }

    #[test]
    fn attrib_values_takes_leading_components() {
        assert_eq!(attrib_values::<2>(&[1.0, 2.0, 3.0], "t").unwrap(), [1.0, 2.0]);
        assert_eq!(
            attrib_values::<4>(&[1.0], "vertex_attrib_4fv"),
            Err(WebGlError::NotEnoughData("vertex_attrib_4fv"))
        );
    }
}
