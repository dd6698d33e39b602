/// `pixelStorei` parameter: flip uploaded images vertically. WebGL only.
pub const UNPACK_FLIP_Y_WEBGL: u32 = 0x9240;
/// `pixelStorei` parameter: premultiply uploaded RGBA data by alpha. WebGL only.
pub const UNPACK_PREMULTIPLY_ALPHA_WEBGL: u32 = 0x9241;

const ALIASED_POINT_SIZE_RANGE: u32 = 0x846D;

/// The shape of the value `get_parameter` returns for a given parameter name.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParameterKind {
    Bool,
    Int,
    Float,
    String,
    Int2,
    Int4,
    Float2,
    Float4,
    Bool4,
    /// A list whose length is read from the given `NUM_*` parameter first.
    IntList(u32),
    /// Three values read one index at a time, as for compute work group limits.
    IndexedInt3,
}

impl ParameterKind {
    pub fn of(pname: u32) -> Self {
        match pname {
            glow::BLEND
            | glow::CULL_FACE
            | glow::DEPTH_TEST
            | glow::DEPTH_WRITEMASK
            | glow::DITHER
            | glow::POLYGON_OFFSET_FILL
            | glow::SAMPLE_COVERAGE_INVERT
            | glow::SCISSOR_TEST
            | glow::STENCIL_TEST
            | UNPACK_FLIP_Y_WEBGL
            | UNPACK_PREMULTIPLY_ALPHA_WEBGL => ParameterKind::Bool,

            glow::DEPTH_CLEAR_VALUE
            | glow::LINE_WIDTH
            | glow::POLYGON_OFFSET_FACTOR
            | glow::POLYGON_OFFSET_UNITS
            | glow::SAMPLE_COVERAGE_VALUE => ParameterKind::Float,

            glow::RENDERER
            | glow::SHADING_LANGUAGE_VERSION
            | glow::VENDOR
            | glow::VERSION
            | glow::EXTENSIONS => ParameterKind::String,

            glow::MAX_VIEWPORT_DIMS => ParameterKind::Int2,

            glow::SCISSOR_BOX | glow::VIEWPORT => ParameterKind::Int4,

            glow::ALIASED_LINE_WIDTH_RANGE
            | ALIASED_POINT_SIZE_RANGE
            | glow::DEPTH_RANGE
            | glow::POINT_SIZE_RANGE
            | glow::SMOOTH_LINE_WIDTH_RANGE
            | glow::VIEWPORT_BOUNDS_RANGE => ParameterKind::Float2,

            glow::BLEND_COLOR | glow::COLOR_CLEAR_VALUE => ParameterKind::Float4,

            glow::COLOR_WRITEMASK => ParameterKind::Bool4,

            glow::COMPRESSED_TEXTURE_FORMATS => {
                ParameterKind::IntList(glow::NUM_COMPRESSED_TEXTURE_FORMATS)
            }
            glow::PROGRAM_BINARY_FORMATS => ParameterKind::IntList(glow::NUM_PROGRAM_BINARY_FORMATS),
            glow::SHADER_BINARY_FORMATS => ParameterKind::IntList(glow::NUM_SHADER_BINARY_FORMATS),

            glow::MAX_COMPUTE_WORK_GROUP_COUNT | glow::MAX_COMPUTE_WORK_GROUP_SIZE => {
                ParameterKind::IndexedInt3
            }

            // Bindings and limits are all plain integers.
            _ => ParameterKind::Int,
        }
    }
}

/// A value returned by `get_parameter`.
#[derive(Clone, Debug, PartialEq)]
pub enum Parameter {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    Int2([i32; 2]),
    Int4([i32; 4]),
    Float2([f32; 2]),
    Float4([f32; 4]),
    Bool4([bool; 4]),
    Int3([i32; 3]),
    IntList(Vec<i32>),
}

impl Parameter {
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Parameter::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Parameter::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Parameter::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Parameter::String(s) => Some(s),
            _ => None,
        }
    }
}

pub(crate) fn bools_from_ints(values: [i32; 4]) -> [bool; 4] {
    [values[0] != 0, values[1] != 0, values[2] != 0, values[3] != 0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_flags_are_bools() {
        for pname in [glow::BLEND, glow::DEPTH_TEST, glow::SCISSOR_TEST, UNPACK_FLIP_Y_WEBGL] {
            assert_eq!(ParameterKind::of(pname), ParameterKind::Bool, "0x{:x}", pname);
        }
    }

    #[test]
    fn arrays_have_their_own_shapes() {
        assert_eq!(ParameterKind::of(glow::VIEWPORT), ParameterKind::Int4);
        assert_eq!(ParameterKind::of(glow::SCISSOR_BOX), ParameterKind::Int4);
        assert_eq!(ParameterKind::of(glow::MAX_VIEWPORT_DIMS), ParameterKind::Int2);
        assert_eq!(ParameterKind::of(glow::DEPTH_RANGE), ParameterKind::Float2);
        assert_eq!(ParameterKind::of(glow::COLOR_CLEAR_VALUE), ParameterKind::Float4);
        assert_eq!(ParameterKind::of(glow::COLOR_WRITEMASK), ParameterKind::Bool4);
    }

    #[test]
    fn strings_and_floats() {
        assert_eq!(ParameterKind::of(glow::VERSION), ParameterKind::String);
        assert_eq!(ParameterKind::of(glow::RENDERER), ParameterKind::String);
        assert_eq!(ParameterKind::of(glow::LINE_WIDTH), ParameterKind::Float);
    }

    #[test]
    fn format_lists_are_sized_by_their_count() {
        assert_eq!(
            ParameterKind::of(glow::COMPRESSED_TEXTURE_FORMATS),
            ParameterKind::IntList(glow::NUM_COMPRESSED_TEXTURE_FORMATS)
        );
        assert_eq!(
            ParameterKind::of(glow::PROGRAM_BINARY_FORMATS),
            ParameterKind::IntList(glow::NUM_PROGRAM_BINARY_FORMATS)
        );
        assert_eq!(
            ParameterKind::of(glow::SHADER_BINARY_FORMATS),
            ParameterKind::IntList(glow::NUM_SHADER_BINARY_FORMATS)
        );
        assert_eq!(ParameterKind::of(glow::NUM_COMPRESSED_TEXTURE_FORMATS), ParameterKind::Int);
    }

    #[test]
    fn compute_limits_are_indexed() {
        for pname in [glow::MAX_COMPUTE_WORK_GROUP_COUNT, glow::MAX_COMPUTE_WORK_GROUP_SIZE] {
            assert_eq!(ParameterKind::of(pname), ParameterKind::IndexedInt3);
        }
        assert_eq!(ParameterKind::of(glow::POINT_SIZE_RANGE), ParameterKind::Float2);
    }

    #[test]
    fn everything_else_is_an_int() {
        assert_eq!(ParameterKind::of(glow::CURRENT_PROGRAM), ParameterKind::Int);
        assert_eq!(ParameterKind::of(glow::MAX_TEXTURE_SIZE), ParameterKind::Int);
        assert_eq!(ParameterKind::of(0xdead), ParameterKind::Int);
    }

    #[test]
    fn write_mask_conversion() {
        assert_eq!(bools_from_ints([1, 0, 1, 0]), [true, false, true, false]);
    }

    #[test]
    fn accessors_reject_other_shapes() {
        assert_eq!(Parameter::Bool(true).as_bool(), Some(true));
        assert_eq!(Parameter::Int(3).as_bool(), None);
        assert_eq!(Parameter::String("4.6".into()).as_str(), Some("4.6"));
        assert_eq!(Parameter::Float(0.5).as_f32(), Some(0.5));
    }
}
