//! Uniform location resolution and value upload.

use gl::types::GLint;
use tracing::debug;

use crate::api::{GraphicsApi, NOT_FOUND};
use crate::checked::Checked;
use crate::shader::LinkedProgram;
use crate::window::FramebufferSize;

/// A resolved uniform location. Compilers may drop unused uniforms, in which
/// case the location is "not found" and uploads to it are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation(Option<GLint>);

impl UniformLocation {
    pub const NOT_FOUND: Self = Self(None);

    pub fn from_raw(raw: GLint) -> Self {
        if raw == NOT_FOUND {
            Self(None)
        } else {
            Self(Some(raw))
        }
    }

    pub fn is_found(self) -> bool {
        self.0.is_some()
    }

    pub fn raw(self) -> GLint {
        self.0.unwrap_or(NOT_FOUND)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Mat4([f32; 16]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniformBinding {
    pub name: String,
    pub location: UniformLocation,
    /// Last value pushed, `None` until the first push.
    pub current: Option<UniformValue>,
}

/// Per-program cache of uniform locations and the values last uploaded.
///
/// Each name is resolved once. A value is only uploaded when it differs from
/// the previous one.
pub struct UniformBinder<'g, G: GraphicsApi + ?Sized> {
    gl: Checked<'g, G>,
    program: gl::types::GLuint,
    bindings: Vec<UniformBinding>,
}

impl<'g, G: GraphicsApi + ?Sized> UniformBinder<'g, G> {
    pub fn new(gl: Checked<'g, G>, program: &LinkedProgram<'g, G>) -> Self {
        Self {
            gl,
            program: program.id(),
            bindings: Vec::new(),
        }
    }

    pub fn bindings(&self) -> &[UniformBinding] {
        &self.bindings
    }

    /// Location for `name`, resolving it against the program on first use.
    pub fn location(&mut self, name: &str) -> UniformLocation {
        let index = self.binding_index(name);
        self.bindings[index].location
    }

    fn binding_index(&mut self, name: &str) -> usize {
        if let Some(index) = self.bindings.iter().position(|b| b.name == name) {
            return index;
        }

        let program = self.program;
        let location = UniformLocation::from_raw(
            self.gl
                .call("glGetUniformLocation", |gl| gl.uniform_location(program, name)),
        );
        if !location.is_found() {
            debug!(name, "uniform not active in program; uploads will be skipped");
        }

        self.bindings.push(UniformBinding {
            name: name.to_owned(),
            location,
            current: None,
        });
        self.bindings.len() - 1
    }

    /// Upload `value` for `name` if it changed. The program must be current.
    ///
    /// Returns whether a GL upload was issued.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        let index = self.binding_index(name);
        let binding = &mut self.bindings[index];
        if binding.current == Some(value) {
            return false;
        }
        binding.current = Some(value);

        let UniformLocation(Some(location)) = binding.location else {
            return false;
        };
        match value {
            UniformValue::Int(v) => self
                .gl
                .call("glUniform1i", |gl| gl.uniform_1i(location, v)),
            UniformValue::Mat4(m) => self
                .gl
                .call("glUniformMatrix4fv", |gl| gl.uniform_matrix4(location, &m)),
        }
        true
    }

    /// Activate `program` and upload every value in `values`.
    pub fn apply(&mut self, program: &LinkedProgram<'g, G>, values: &[(&str, UniformValue)]) {
        debug_assert_eq!(program.id(), self.program);
        program.activate();
        for (name, value) in values {
            self.set(name, *value);
        }
    }
}

/// Computes the uniform values for one frame.
pub trait UniformSource {
    fn values(&self, size: FramebufferSize) -> Vec<(&'static str, UniformValue)>;
}

/// `width` and `height` in pixels, taken from the framebuffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FramebufferExtent;

impl UniformSource for FramebufferExtent {
    fn values(&self, size: FramebufferSize) -> Vec<(&'static str, UniformValue)> {
        vec![
            ("width", UniformValue::Int(size.width_i32())),
            ("height", UniformValue::Int(size.height_i32())),
        ]
    }
}

pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, //
];

/// The identity model-view-projection matrix bound under `name`.
#[derive(Debug, Clone, Copy)]
pub struct IdentityTransform {
    pub name: &'static str,
}

impl Default for IdentityTransform {
    fn default() -> Self {
        Self { name: "MVP" }
    }
}

impl UniformSource for IdentityTransform {
    fn values(&self, _size: FramebufferSize) -> Vec<(&'static str, UniformValue)> {
        vec![(self.name, UniformValue::Mat4(IDENTITY))]
    }
}
