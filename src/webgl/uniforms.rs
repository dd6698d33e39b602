use glow::HasContext;

use super::context::*;
use super::error::*;
use super::objects::*;

/// The value of a uniform, in the scalar type GLSL declares it with. Vectors and matrices
/// are flattened in column-major order.
#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    Float(Vec<f32>),
    Int(Vec<i32>),
    Uint(Vec<u32>),
    Bool(Vec<bool>),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum UniformScalar {
    Float,
    Int,
    Uint,
    Bool,
}

/// Scalar type and component count of a uniform type. Samplers and images read back as
/// the texture unit they're bound to.
pub(crate) fn uniform_shape(ty: u32) -> Option<(UniformScalar, usize)> {
    use UniformScalar::*;
    Some(match ty {
        glow::FLOAT => (Float, 1),
        glow::FLOAT_VEC2 => (Float, 2),
        glow::FLOAT_VEC3 => (Float, 3),
        glow::FLOAT_VEC4 => (Float, 4),
        glow::FLOAT_MAT2 => (Float, 4),
        glow::FLOAT_MAT3 => (Float, 9),
        glow::FLOAT_MAT4 => (Float, 16),
        glow::FLOAT_MAT2x3 | glow::FLOAT_MAT3x2 => (Float, 6),
        glow::FLOAT_MAT2x4 | glow::FLOAT_MAT4x2 => (Float, 8),
        glow::FLOAT_MAT3x4 | glow::FLOAT_MAT4x3 => (Float, 12),
        glow::INT => (Int, 1),
        glow::INT_VEC2 => (Int, 2),
        glow::INT_VEC3 => (Int, 3),
        glow::INT_VEC4 => (Int, 4),
        glow::UNSIGNED_INT => (Uint, 1),
        glow::UNSIGNED_INT_VEC2 => (Uint, 2),
        glow::UNSIGNED_INT_VEC3 => (Uint, 3),
        glow::UNSIGNED_INT_VEC4 => (Uint, 4),
        glow::BOOL => (Bool, 1),
        glow::BOOL_VEC2 => (Bool, 2),
        glow::BOOL_VEC3 => (Bool, 3),
        glow::BOOL_VEC4 => (Bool, 4),
        glow::SAMPLER_2D
        | glow::SAMPLER_3D
        | glow::SAMPLER_CUBE
        | glow::SAMPLER_2D_SHADOW
        | glow::SAMPLER_2D_ARRAY
        | glow::SAMPLER_2D_ARRAY_SHADOW
        | glow::SAMPLER_CUBE_SHADOW
        | glow::INT_SAMPLER_2D
        | glow::INT_SAMPLER_3D
        | glow::INT_SAMPLER_CUBE
        | glow::INT_SAMPLER_2D_ARRAY
        | glow::UNSIGNED_INT_SAMPLER_2D
        | glow::UNSIGNED_INT_SAMPLER_3D
        | glow::UNSIGNED_INT_SAMPLER_CUBE
        | glow::UNSIGNED_INT_SAMPLER_2D_ARRAY
        | glow::IMAGE_2D
        | glow::IMAGE_3D
        | glow::IMAGE_2D_ARRAY
        | glow::IMAGE_CUBE => (Int, 1),
        _ => return None,
    })
}

/// Names under which each element of an active uniform has its own location: the
/// name itself for a single value, `name[i]` for each element of an array.
pub(crate) fn element_names(name: &str, size: i32) -> Vec<String> {
    match name.strip_suffix("[0]") {
        Some(base) if size > 1 => (0..size).map(|i| format!("{}[{}]", base, i)).collect(),
        _ => vec![name.to_owned()],
    }
}

/// Checks a `uniform{N}{f,i,ui}v` array: non-empty and a whole number of vectors.
pub(crate) fn check_vector_data(len: usize, components: usize) -> Result<(), WebGlError> {
    if len == 0 || len % components != 0 {
        return Err(WebGlError::InvalidValue(format!(
            "uniform data of length {} is not a multiple of {}",
            len, components
        )));
    }
    Ok(())
}

/// Returns how many floats of a `uniformMatrix{N}fv` array GL will read. Any trailing
/// partial matrix is dropped.
pub(crate) fn matrix_data_len(len: usize, dim: usize) -> Result<usize, WebGlError> {
    let per_matrix = dim * dim;
    if len < per_matrix {
        return Err(WebGlError::NotEnoughData(match dim {
            2 => "UniformMatrix2fv",
            3 => "UniformMatrix3fv",
            _ => "UniformMatrix4fv",
        }));
    }
    Ok(len / per_matrix * per_matrix)
}

// Each setter is a no-op for a `None` location, matching WebGL's null location.
macro_rules! uniform_scalar {
    ($name:ident, $gl:ident, $t:ty, $($arg:ident),+) => {
        pub fn $name(
            &self,
            location: Option<&WebGlUniformLocation>,
            $($arg: $t),+
        ) -> Result<(), WebGlError> {
            if let Some(location) = location {
                let location = location.raw_for(self.owner())?;
                unsafe { self.inner().$gl(Some(location), $($arg),+) };
            }
            Ok(())
        }
    };
}

macro_rules! uniform_vector {
    ($name:ident, $gl:ident, $t:ty, $components:expr) => {
        pub fn $name(
            &self,
            location: Option<&WebGlUniformLocation>,
            data: &[$t],
        ) -> Result<(), WebGlError> {
            check_vector_data(data.len(), $components)?;
            if let Some(location) = location {
                let location = location.raw_for(self.owner())?;
                unsafe { self.inner().$gl(Some(location), data) };
            }
            Ok(())
        }
    };
}

macro_rules! uniform_matrix {
    ($name:ident, $gl:ident, $dim:expr) => {
        pub fn $name(
            &self,
            location: Option<&WebGlUniformLocation>,
            transpose: bool,
            data: &[f32],
        ) -> Result<(), WebGlError> {
            let len = matrix_data_len(data.len(), $dim)?;
            if let Some(location) = location {
                let location = location.raw_for(self.owner())?;
                unsafe { self.inner().$gl(Some(location), transpose, &data[..len]) };
            }
            Ok(())
        }
    };
}

impl WebGlRenderingContext {
    /// Reads the current value at `location`, shaped by the type of the active uniform it
    /// belongs to.
    pub fn get_uniform(
        &self,
        program: &WebGlProgram,
        location: &WebGlUniformLocation,
    ) -> Result<UniformValue, WebGlError> {
        let raw = program.raw_for(self.owner())?;
        let location = location.raw_for(self.owner())?;
        let ty = self.uniform_type_at(raw, location).ok_or_else(|| {
            WebGlError::InvalidOperation("location does not belong to this program".to_owned())
        })?;
        let (scalar, components) =
            uniform_shape(ty).ok_or(WebGlError::InvalidEnum(ty, "get_uniform"))?;

        let gl = self.inner();
        Ok(unsafe {
            match scalar {
                UniformScalar::Float => {
                    let mut values = vec![0.0; components];
                    gl.get_uniform_f32(raw, location, &mut values);
                    UniformValue::Float(values)
                }
                UniformScalar::Int => {
                    let mut values = vec![0; components];
                    gl.get_uniform_i32(raw, location, &mut values);
                    UniformValue::Int(values)
                }
                UniformScalar::Uint => {
                    let mut values = vec![0; components];
                    gl.get_uniform_u32(raw, location, &mut values);
                    UniformValue::Uint(values)
                }
                UniformScalar::Bool => {
                    let mut values = vec![0; components];
                    gl.get_uniform_i32(raw, location, &mut values);
                    UniformValue::Bool(values.into_iter().map(|v| v != 0).collect())
                }
            }
        })
    }

    fn uniform_type_at(&self, program: GlProgram, location: &GlUniformLocation) -> Option<u32> {
        let gl = self.inner();
        unsafe {
            (0..gl.get_active_uniforms(program)).find_map(|index| {
                let info = gl.get_active_uniform(program, index)?;
                element_names(&info.name, info.size)
                    .iter()
                    .any(|name| gl.get_uniform_location(program, name).as_ref() == Some(location))
                    .then(|| info.utype)
            })
        }
    }

    uniform_scalar!(uniform_1f, uniform_1_f32, f32, x);
    uniform_scalar!(uniform_2f, uniform_2_f32, f32, x, y);
    uniform_scalar!(uniform_3f, uniform_3_f32, f32, x, y, z);
    uniform_scalar!(uniform_4f, uniform_4_f32, f32, x, y, z, w);
    uniform_scalar!(uniform_1i, uniform_1_i32, i32, x);
    uniform_scalar!(uniform_2i, uniform_2_i32, i32, x, y);
    uniform_scalar!(uniform_3i, uniform_3_i32, i32, x, y, z);
    uniform_scalar!(uniform_4i, uniform_4_i32, i32, x, y, z, w);
    uniform_scalar!(uniform_1ui, uniform_1_u32, u32, x);
    uniform_scalar!(uniform_2ui, uniform_2_u32, u32, x, y);
    uniform_scalar!(uniform_3ui, uniform_3_u32, u32, x, y, z);
    uniform_scalar!(uniform_4ui, uniform_4_u32, u32, x, y, z, w);

    uniform_vector!(uniform_1fv, uniform_1_f32_slice, f32, 1);
    uniform_vector!(uniform_2fv, uniform_2_f32_slice, f32, 2);
    uniform_vector!(uniform_3fv, uniform_3_f32_slice, f32, 3);
    uniform_vector!(uniform_4fv, uniform_4_f32_slice, f32, 4);
    uniform_vector!(uniform_1iv, uniform_1_i32_slice, i32, 1);
    uniform_vector!(uniform_2iv, uniform_2_i32_slice, i32, 2);
    uniform_vector!(uniform_3iv, uniform_3_i32_slice, i32, 3);
    uniform_vector!(uniform_4iv, uniform_4_i32_slice, i32, 4);
    uniform_vector!(uniform_1uiv, uniform_1_u32_slice, u32, 1);
    uniform_vector!(uniform_2uiv, uniform_2_u32_slice, u32, 2);
    uniform_vector!(uniform_3uiv, uniform_3_u32_slice, u32, 3);
    uniform_vector!(uniform_4uiv, uniform_4_u32_slice, u32, 4);

    uniform_matrix!(uniform_matrix_2fv, uniform_matrix_2_f32_slice, 2);
    uniform_matrix!(uniform_matrix_3fv, uniform_matrix_3_f32_slice, 3);
    uniform_matrix!(uniform_matrix_4fv, uniform_matrix_4_f32_slice, 4);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_must_be_whole() {
        assert!(check_vector_data(6, 3).is_ok());
        assert!(check_vector_data(4, 1).is_ok());
        assert!(matches!(check_vector_data(5, 2), Err(WebGlError::InvalidValue(_))));
        assert!(matches!(check_vector_data(0, 4), Err(WebGlError::InvalidValue(_))));
    }

    #[test]
    fn short_matrix_data_is_reported_per_size() {
        assert_eq!(matrix_data_len(3, 2), Err(WebGlError::NotEnoughData("UniformMatrix2fv")));
        assert_eq!(matrix_data_len(8, 3), Err(WebGlError::NotEnoughData("UniformMatrix3fv")));
        assert_eq!(matrix_data_len(15, 4), Err(WebGlError::NotEnoughData("UniformMatrix4fv")));
        assert_eq!(
            WebGlError::NotEnoughData("UniformMatrix4fv").to_string(),
            "Not enough data for UniformMatrix4fv"
        );
    }

    #[test]
    fn uniform_types_have_shapes() {
        assert_eq!(uniform_shape(glow::FLOAT_MAT4), Some((UniformScalar::Float, 16)));
        assert_eq!(uniform_shape(glow::FLOAT_MAT2x3), Some((UniformScalar::Float, 6)));
        assert_eq!(uniform_shape(glow::UNSIGNED_INT_VEC3), Some((UniformScalar::Uint, 3)));
        assert_eq!(uniform_shape(glow::BOOL_VEC2), Some((UniformScalar::Bool, 2)));
        assert_eq!(uniform_shape(glow::SAMPLER_2D), Some((UniformScalar::Int, 1)));
        assert_eq!(uniform_shape(glow::TEXTURE_2D), None);
    }

    #[test]
    fn array_uniforms_have_a_location_per_element() {
        assert_eq!(element_names("u_color", 1), ["u_color"]);
        assert_eq!(element_names("u_lights[0]", 3), ["u_lights[0]", "u_lights[1]", "u_lights[2]"]);
        assert_eq!(element_names("u_single[0]", 1), ["u_single[0]"]);
    }

    #[test]
    fn trailing_partial_matrix_is_dropped() {
        assert_eq!(matrix_data_len(16, 4), Ok(16));
        assert_eq!(matrix_data_len(20, 4), Ok(16));
        assert_eq!(matrix_data_len(18, 3), Ok(18));
    }
}
