use fxhash::FxHashMap;
use glow::HasContext;
use std::hash::Hash;

use super::context::*;
use super::error::*;
use super::objects::*;
use super::parameters::Parameter;

/// Size, type and name of an active uniform, attribute or transform feedback varying.
#[derive(Clone, Debug, PartialEq)]
pub struct WebGlActiveInfo {
    pub size: i32,
    pub ty: u32,
    pub name: String,
}

/// Range and precision of one shader precision qualifier, as log2 values and bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WebGlShaderPrecisionFormat {
    pub range_min: i32,
    pub range_max: i32,
    pub precision: i32,
}

/// The values `get_shader_parameter` answers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ShaderParameter {
    DeleteStatus,
    CompileStatus,
    ShaderType,
    InfoLogLength,
    SourceLength,
}

impl ShaderParameter {
    pub fn of(pname: u32) -> Option<Self> {
        match pname {
            glow::DELETE_STATUS => Some(ShaderParameter::DeleteStatus),
            glow::COMPILE_STATUS => Some(ShaderParameter::CompileStatus),
            glow::SHADER_TYPE => Some(ShaderParameter::ShaderType),
            glow::INFO_LOG_LENGTH => Some(ShaderParameter::InfoLogLength),
            glow::SHADER_SOURCE_LENGTH => Some(ShaderParameter::SourceLength),
            _ => None,
        }
    }
}

/// The values `get_program_parameter` answers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProgramParameter {
    DeleteStatus,
    LinkStatus,
    ValidateStatus,
    AttachedShaders,
    ActiveAttributes,
    ActiveUniforms,
    ActiveUniformBlocks,
    TransformFeedbackBufferMode,
    TransformFeedbackVaryings,
}

impl ProgramParameter {
    pub fn of(pname: u32) -> Option<Self> {
        match pname {
            glow::DELETE_STATUS => Some(ProgramParameter::DeleteStatus),
            glow::LINK_STATUS => Some(ProgramParameter::LinkStatus),
            glow::VALIDATE_STATUS => Some(ProgramParameter::ValidateStatus),
            glow::ATTACHED_SHADERS => Some(ProgramParameter::AttachedShaders),
            glow::ACTIVE_ATTRIBUTES => Some(ProgramParameter::ActiveAttributes),
            glow::ACTIVE_UNIFORMS => Some(ProgramParameter::ActiveUniforms),
            glow::ACTIVE_UNIFORM_BLOCKS => Some(ProgramParameter::ActiveUniformBlocks),
            glow::TRANSFORM_FEEDBACK_BUFFER_MODE => {
                Some(ProgramParameter::TransformFeedbackBufferMode)
            }
            glow::TRANSFORM_FEEDBACK_VARYINGS => Some(ProgramParameter::TransformFeedbackVaryings),
            _ => None,
        }
    }

    pub fn is_bool(self) -> bool {
        matches!(
            self,
            ProgramParameter::DeleteStatus
                | ProgramParameter::LinkStatus
                | ProgramParameter::ValidateStatus
        )
    }
}

/// GL counts the terminating NUL in string lengths, and reports 0 for an empty string.
pub(crate) fn gl_string_length(s: &str) -> i32 {
    if s.is_empty() {
        0
    } else {
        s.len() as i32 + 1
    }
}

impl WebGlRenderingContext {
    pub fn create_shader(&self, shader_type: u32) -> Result<WebGlShader, WebGlError> {
        match shader_type {
            glow::VERTEX_SHADER | glow::FRAGMENT_SHADER | glow::COMPUTE_SHADER => (),
            _ => return Err(WebGlError::InvalidEnum(shader_type, "create_shader")),
        }
        let raw = unsafe { self.inner().create_shader(shader_type) }
            .map_err(|e| WebGlError::CreateFailed(GlObjectKind::Shader, e))?;
        self.track(RawObject::Shader(raw));
        self.state().shaders.insert(raw, shader_type);
        Ok(WebGlShader { raw, owner: self.owner() })
    }

    /// Deletes `shader`. GL keeps a shader that is still attached to a program until it's
    /// detached; until then `DELETE_STATUS` reads true.
    pub fn delete_shader(&self, shader: &WebGlShader) -> Result<(), WebGlError> {
        let raw = shader.raw_for(self.owner())?;
        self.untrack(RawObject::Shader(raw));
        {
            let mut state = self.state();
            let attached = state.attachments.is_attached(raw);
            state.shaders.delete(raw, attached);
        }
        unsafe { self.inner().delete_shader(raw) };
        Ok(())
    }

    pub fn is_shader(&self, shader: Option<&WebGlShader>) -> bool {
        is_object!(self, shader, Shader, is_shader)
    }

    pub fn shader_source(&self, shader: &WebGlShader, source: &str) -> Result<(), WebGlError> {
        let raw = shader.raw_for(self.owner())?;
        self.state().shaders.record(raw)?.source = Some(source.to_owned());
        unsafe { self.inner().shader_source(raw, source) };
        Ok(())
    }

    /// Returns the source last given to `shader_source`, or an empty string.
    pub fn get_shader_source(&self, shader: &WebGlShader) -> Result<String, WebGlError> {
        let raw = shader.raw_for(self.owner())?;
        let source = self.state().shaders.record(raw)?.source.clone();
        Ok(source.unwrap_or_default())
    }

    pub fn compile_shader(&self, shader: &WebGlShader) -> Result<(), WebGlError> {
        let raw = shader.raw_for(self.owner())?;
        unsafe { self.inner().compile_shader(raw) };
        Ok(())
    }

    /// Answers the parameters listed in `ShaderParameter`. Type, source and deletion state
    /// come from the context's own records.
    pub fn get_shader_parameter(&self, shader: &WebGlShader, pname: u32) -> Result<Parameter, WebGlError> {
        let raw = shader.raw_for(self.owner())?;
        let parameter =
            ShaderParameter::of(pname).ok_or(WebGlError::InvalidEnum(pname, "get_shader_parameter"))?;
        let record = self.state().shaders.record(raw)?.clone();
        let gl = self.inner();
        Ok(match parameter {
            ShaderParameter::DeleteStatus => Parameter::Bool(record.delete_pending),
            ShaderParameter::CompileStatus => {
                Parameter::Bool(unsafe { gl.get_shader_compile_status(raw) })
            }
            ShaderParameter::ShaderType => Parameter::Int(record.ty as i32),
            ShaderParameter::InfoLogLength => {
                Parameter::Int(gl_string_length(&unsafe { gl.get_shader_info_log(raw) }))
            }
            ShaderParameter::SourceLength => {
                Parameter::Int(gl_string_length(record.source.as_deref().unwrap_or("")))
            }
        })
    }

    pub fn get_shader_info_log(&self, shader: &WebGlShader) -> Result<String, WebGlError> {
        let raw = shader.raw_for(self.owner())?;
        Ok(unsafe { self.inner().get_shader_info_log(raw) })
    }

    pub fn create_program(&self) -> Result<WebGlProgram, WebGlError> {
        let raw = unsafe { self.inner().create_program() }
            .map_err(|e| WebGlError::CreateFailed(GlObjectKind::Program, e))?;
        self.track(RawObject::Program(raw));
        Ok(WebGlProgram { raw, owner: self.owner() })
    }

    pub fn delete_program(&self, program: &WebGlProgram) -> Result<(), WebGlError> {
        let raw = program.raw_for(self.owner())?;
        self.untrack(RawObject::Program(raw));
        {
            let mut state = self.state();
            let shaders = state.attachments.shaders_of(raw);
            state.attachments.forget_program(raw);
            for shader in shaders {
                let attached = state.attachments.is_attached(shader);
                state.shaders.detached(shader, attached);
            }
        }
        unsafe { self.inner().delete_program(raw) };
        Ok(())
    }

    pub fn is_program(&self, program: Option<&WebGlProgram>) -> bool {
        is_object!(self, program, Program, is_program)
    }

    pub fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) -> Result<(), WebGlError> {
        let (program, shader) = (program.raw_for(self.owner())?, shader.raw_for(self.owner())?);
        unsafe { self.inner().attach_shader(program, shader) };
        self.state().attachments.attach(program, shader);
        Ok(())
    }

    pub fn detach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) -> Result<(), WebGlError> {
        let (program, shader) = (program.raw_for(self.owner())?, shader.raw_for(self.owner())?);
        unsafe { self.inner().detach_shader(program, shader) };
        let mut state = self.state();
        state.attachments.detach(program, shader);
        let attached = state.attachments.is_attached(shader);
        state.shaders.detached(shader, attached);
        Ok(())
    }

    /// Returns the shaders currently attached to `program`, in attachment order.
    pub fn get_attached_shaders(&self, program: &WebGlProgram) -> Result<Vec<WebGlShader>, WebGlError> {
        let raw = program.raw_for(self.owner())?;
        let shaders = self.state().attachments.shaders_of(raw);
        Ok(shaders.into_iter().map(|raw| WebGlShader { raw, owner: self.owner() }).collect())
    }

    pub fn link_program(&self, program: &WebGlProgram) -> Result<(), WebGlError> {
        let raw = program.raw_for(self.owner())?;
        unsafe { self.inner().link_program(raw) };
        Ok(())
    }

    pub fn use_program(&self, program: Option<&WebGlProgram>) -> Result<(), WebGlError> {
        let raw = raw_opt!(program, self.owner());
        unsafe { self.inner().use_program(raw) };
        Ok(())
    }

    /// Checks whether `program` can run in the current GL state. The result is read back
    /// through `VALIDATE_STATUS` and the info log.
    pub fn validate_program(&self, program: &WebGlProgram) -> Result<(), WebGlError> {
        let raw = program.raw_for(self.owner())?;
        unsafe { self.inner().validate_program(raw) };
        Ok(())
    }

    /// Answers the parameters listed in `ProgramParameter`. `ATTACHED_SHADERS` is counted
    /// from the context's own attachment records.
    pub fn get_program_parameter(
        &self,
        program: &WebGlProgram,
        pname: u32,
    ) -> Result<Parameter, WebGlError> {
        let raw = program.raw_for(self.owner())?;
        let parameter = ProgramParameter::of(pname)
            .ok_or(WebGlError::InvalidEnum(pname, "get_program_parameter"))?;
        let gl = self.inner();
        Ok(unsafe {
            match parameter {
                ProgramParameter::LinkStatus => Parameter::Bool(gl.get_program_link_status(raw)),
                ProgramParameter::ValidateStatus => {
                    Parameter::Bool(gl.get_program_validate_status(raw))
                }
                ProgramParameter::AttachedShaders => {
                    Parameter::Int(self.state().attachments.count(raw) as i32)
                }
                ProgramParameter::ActiveUniforms => Parameter::Int(gl.get_active_uniforms(raw) as i32),
                ProgramParameter::ActiveAttributes => {
                    Parameter::Int(gl.get_active_attributes(raw) as i32)
                }
                other if other.is_bool() => {
                    Parameter::Bool(gl.get_program_parameter_i32(raw, pname) != 0)
                }
                _ => Parameter::Int(gl.get_program_parameter_i32(raw, pname)),
            }
        })
    }

    pub fn get_program_info_log(&self, program: &WebGlProgram) -> Result<String, WebGlError> {
        let raw = program.raw_for(self.owner())?;
        Ok(unsafe { self.inner().get_program_info_log(raw) })
    }

    pub fn get_active_uniform(
        &self,
        program: &WebGlProgram,
        index: u32,
    ) -> Result<Option<WebGlActiveInfo>, WebGlError> {
        let raw = program.raw_for(self.owner())?;
        let info = unsafe { self.inner().get_active_uniform(raw, index) };
        Ok(info.map(|u| WebGlActiveInfo { size: u.size, ty: u.utype, name: u.name }))
    }

    pub fn get_active_attrib(
        &self,
        program: &WebGlProgram,
        index: u32,
    ) -> Result<Option<WebGlActiveInfo>, WebGlError> {
        let raw = program.raw_for(self.owner())?;
        let info = unsafe { self.inner().get_active_attribute(raw, index) };
        Ok(info.map(|a| WebGlActiveInfo { size: a.size, ty: a.atype, name: a.name }))
    }

    pub fn bind_attrib_location(
        &self,
        program: &WebGlProgram,
        index: u32,
        name: &str,
    ) -> Result<(), WebGlError> {
        let raw = program.raw_for(self.owner())?;
        check_identifier(name)?;
        unsafe { self.inner().bind_attrib_location(raw, index, name) };
        Ok(())
    }

    /// Returns -1 when `name` isn't an active attribute, as WebGL does.
    pub fn get_attrib_location(&self, program: &WebGlProgram, name: &str) -> Result<i32, WebGlError> {
        let raw = program.raw_for(self.owner())?;
        let location = unsafe { self.inner().get_attrib_location(raw, name) };
        Ok(location.map_or(-1, |l| l as i32))
    }

    pub fn get_uniform_location(
        &self,
        program: &WebGlProgram,
        name: &str,
    ) -> Result<Option<WebGlUniformLocation>, WebGlError> {
        let raw = program.raw_for(self.owner())?;
        let location = unsafe { self.inner().get_uniform_location(raw, name) };
        Ok(location.map(|raw| WebGlUniformLocation { raw, owner: self.owner() }))
    }

    pub fn transform_feedback_varyings(
        &self,
        program: &WebGlProgram,
        varyings: &[&str],
        buffer_mode: u32,
    ) -> Result<(), WebGlError> {
        let raw = program.raw_for(self.owner())?;
        unsafe { self.inner().transform_feedback_varyings(raw, varyings, buffer_mode) };
        Ok(())
    }

    pub fn get_transform_feedback_varying(
        &self,
        program: &WebGlProgram,
        index: u32,
    ) -> Result<Option<WebGlActiveInfo>, WebGlError> {
        let raw = program.raw_for(self.owner())?;
        let info = unsafe { self.inner().get_transform_feedback_varying(raw, index) };
        Ok(info.map(|v| WebGlActiveInfo { size: v.size, ty: v.tftype, name: v.name }))
    }

    pub fn get_shader_precision_format(
        &self,
        shader_type: u32,
        precision_type: u32,
    ) -> Result<Option<WebGlShaderPrecisionFormat>, WebGlError> {
        check_precision_query(shader_type, precision_type)?;
        let format =
            unsafe { self.inner().get_shader_precision_format(shader_type, precision_type) };
        Ok(format.map(|f| WebGlShaderPrecisionFormat {
            range_min: f.range_min,
            range_max: f.range_max,
            precision: f.precision,
        }))
    }
}

fn check_precision_query(shader_type: u32, precision_type: u32) -> Result<(), WebGlError> {
    match shader_type {
        glow::VERTEX_SHADER | glow::FRAGMENT_SHADER => (),
        _ => return Err(WebGlError::InvalidEnum(shader_type, "get_shader_precision_format")),
    }
    match precision_type {
        glow::LOW_FLOAT
        | glow::MEDIUM_FLOAT
        | glow::HIGH_FLOAT
        | glow::LOW_INT
        | glow::MEDIUM_INT
        | glow::HIGH_INT => Ok(()),
        _ => Err(WebGlError::InvalidEnum(precision_type, "get_shader_precision_format")),
    }
}

/// What the context remembers about a shader it created.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderRecord {
    pub ty: u32,
    pub source: Option<String>,
    /// Deleted while still attached; GL frees it on the last detach.
    pub delete_pending: bool,
}

/// Shader records keyed by GL name. A record lives until GL would free the shader.
pub struct ShaderTable<S> {
    records: FxHashMap<S, ShaderRecord>,
}

impl<S: Copy + Eq + Hash> ShaderTable<S> {
    pub fn new() -> Self {
        Self { records: FxHashMap::default() }
    }

    pub fn insert(&mut self, shader: S, ty: u32) {
        self.records.insert(shader, ShaderRecord { ty, source: None, delete_pending: false });
    }

    pub fn get(&self, shader: S) -> Option<&ShaderRecord> {
        self.records.get(&shader)
    }

    pub(crate) fn record(&mut self, shader: S) -> Result<&mut ShaderRecord, WebGlError> {
        self.records
            .get_mut(&shader)
            .ok_or_else(|| WebGlError::InvalidValue("shader has been deleted".to_owned()))
    }

    pub fn delete(&mut self, shader: S, attached: bool) {
        if attached {
            if let Some(record) = self.records.get_mut(&shader) {
                record.delete_pending = true;
            }
        } else {
            self.records.remove(&shader);
        }
    }

    /// Called after `shader` was detached somewhere; frees a pending delete once no
    /// program holds it.
    pub fn detached(&mut self, shader: S, still_attached: bool) {
        let pending = self.records.get(&shader).map_or(false, |r| r.delete_pending);
        if pending && !still_attached {
            self.records.remove(&shader);
        }
    }
}

impl<S: Copy + Eq + Hash> Default for ShaderTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which shaders are attached to which programs, tracked on the client side.
pub struct Attachments<P, S> {
    pairs: Vec<(P, S)>,
}

impl<P: Copy + PartialEq, S: Copy + PartialEq> Attachments<P, S> {
    pub fn new() -> Self {
        Self { pairs: vec![] }
    }

    /// Attaching the same shader twice is a no-op.
    pub fn attach(&mut self, program: P, shader: S) {
        if !self.pairs.contains(&(program, shader)) {
            self.pairs.push((program, shader));
        }
    }

    pub fn detach(&mut self, program: P, shader: S) {
        self.pairs.retain(|pair| *pair != (program, shader));
    }

    pub fn forget_program(&mut self, program: P) {
        self.pairs.retain(|(p, _)| *p != program);
    }

    pub fn shaders_of(&self, program: P) -> Vec<S> {
        self.pairs.iter().filter(|(p, _)| *p == program).map(|(_, s)| *s).collect()
    }

    pub fn count(&self, program: P) -> usize {
        self.pairs.iter().filter(|(p, _)| *p == program).count()
    }

    pub fn is_attached(&self, shader: S) -> bool {
        self.pairs.iter().any(|(_, s)| *s == shader)
    }
}

impl<P: Copy + PartialEq, S: Copy + PartialEq> Default for Attachments<P, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Attribute names may not use the reserved `gl_`/`webgl_` prefixes.
pub(crate) fn check_identifier(name: &str) -> Result<(), WebGlError> {
    if name.starts_with("gl_") || name.starts_with("webgl_") || name.starts_with("_webgl_") {
        return Err(WebGlError::InvalidOperation(format!("reserved identifier {:?}", name)));
    }
    if name.is_empty() || name.len() > 256 {
        return Err(WebGlError::InvalidValue(format!("bad identifier length {}", name.len())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_prefixes_are_rejected() {
        assert!(matches!(check_identifier("gl_Position"), Err(WebGlError::InvalidOperation(_))));
        assert!(matches!(check_identifier("webgl_x"), Err(WebGlError::InvalidOperation(_))));
        assert!(check_identifier("a_position").is_ok());
    }

    #[test]
    fn attachments_follow_attach_and_detach() {
        let mut attachments = Attachments::new();
        attachments.attach(1, 10);
        attachments.attach(1, 11);
        attachments.attach(1, 10);
        attachments.attach(2, 10);
        assert_eq!(attachments.shaders_of(1), vec![10, 11]);

        attachments.detach(1, 10);
        assert_eq!(attachments.shaders_of(1), vec![11]);
        assert_eq!(attachments.shaders_of(2), vec![10]);

        attachments.forget_program(2);
        assert!(attachments.shaders_of(2).is_empty());
        assert_eq!(attachments.count(2), 0);
        assert!(attachments.is_attached(11));
        assert!(!attachments.is_attached(10));
    }

    #[test]
    fn shader_parameters_are_classified() {
        assert_eq!(ShaderParameter::of(glow::DELETE_STATUS), Some(ShaderParameter::DeleteStatus));
        assert_eq!(ShaderParameter::of(glow::COMPILE_STATUS), Some(ShaderParameter::CompileStatus));
        assert_eq!(ShaderParameter::of(glow::SHADER_TYPE), Some(ShaderParameter::ShaderType));
        assert_eq!(ShaderParameter::of(glow::INFO_LOG_LENGTH), Some(ShaderParameter::InfoLogLength));
        assert_eq!(
            ShaderParameter::of(glow::SHADER_SOURCE_LENGTH),
            Some(ShaderParameter::SourceLength)
        );
        assert_eq!(ShaderParameter::of(glow::LINK_STATUS), None);
    }

    #[test]
    fn program_parameters_are_classified() {
        for pname in [glow::DELETE_STATUS, glow::LINK_STATUS, glow::VALIDATE_STATUS] {
            assert!(ProgramParameter::of(pname).unwrap().is_bool(), "0x{:x}", pname);
        }
        for pname in [
            glow::ATTACHED_SHADERS,
            glow::ACTIVE_ATTRIBUTES,
            glow::ACTIVE_UNIFORMS,
            glow::ACTIVE_UNIFORM_BLOCKS,
            glow::TRANSFORM_FEEDBACK_VARYINGS,
        ] {
            assert!(!ProgramParameter::of(pname).unwrap().is_bool(), "0x{:x}", pname);
        }
        assert_eq!(
            ProgramParameter::of(glow::ATTACHED_SHADERS),
            Some(ProgramParameter::AttachedShaders)
        );
        assert_eq!(ProgramParameter::of(glow::COMPILE_STATUS), None);
    }

    #[test]
    fn string_lengths_count_the_terminator() {
        assert_eq!(gl_string_length(""), 0);
        assert_eq!(gl_string_length("void main() {}"), 15);
    }

    #[test]
    fn shader_records_keep_type_and_source() {
        let mut shaders = ShaderTable::new();
        shaders.insert(3, glow::FRAGMENT_SHADER);
        shaders.record(3).unwrap().source = Some("void main() {}".to_owned());

        let record = shaders.get(3).unwrap();
        assert_eq!(record.ty, glow::FRAGMENT_SHADER);
        assert_eq!(record.source.as_deref(), Some("void main() {}"));
        assert!(matches!(shaders.record(4), Err(WebGlError::InvalidValue(_))));
    }

    #[test]
    fn deleting_an_attached_shader_waits_for_detach() {
        let mut shaders = ShaderTable::new();
        shaders.insert(5, glow::VERTEX_SHADER);
        shaders.delete(5, true);
        assert!(shaders.get(5).unwrap().delete_pending);

        shaders.detached(5, true);
        assert!(shaders.get(5).is_some());
        shaders.detached(5, false);
        assert!(shaders.get(5).is_none());

        shaders.insert(6, glow::VERTEX_SHADER);
        shaders.delete(6, false);
        assert!(shaders.get(6).is_none());
    }

    #[test]
    fn precision_queries_take_shader_and_precision_enums() {
        assert!(check_precision_query(glow::FRAGMENT_SHADER, glow::HIGH_FLOAT).is_ok());
        assert_eq!(
            check_precision_query(glow::COMPUTE_SHADER, glow::HIGH_FLOAT),
            Err(WebGlError::InvalidEnum(glow::COMPUTE_SHADER, "get_shader_precision_format"))
        );
        assert!(check_precision_query(glow::VERTEX_SHADER, glow::FLOAT).is_err());
    }

    #[test]
    fn identifier_length_is_bounded() {
        assert!(matches!(check_identifier(""), Err(WebGlError::InvalidValue(_))));
        assert!(check_identifier(&"a".repeat(256)).is_ok());
        assert!(check_identifier(&"a".repeat(257)).is_err());
    }
}
