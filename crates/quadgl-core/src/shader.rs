//! Shader compilation and program linking.
//!
//! [`ProgramBuilder::build`] is the only way to obtain a [`LinkedProgram`],
//! so a program that failed to link can never be activated. Compile, link and
//! validate status are checked explicitly and a failure is reported with the
//! driver's info log before the fatal handler runs.

use std::fmt;

use gl::types::{GLenum, GLint, GLuint};
use tracing::{debug, info};

use crate::api::{GraphicsApi, NOT_FOUND};
use crate::checked::Checked;
use crate::error::HarnessError;
use crate::uniform::UniformLocation;

/// Reported in place of an empty driver log.
pub const EMPTY_LOG_PLACEHOLDER: &str = "<driver returned an empty info log>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            Self::Vertex => gl::VERTEX_SHADER,
            Self::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader text tagged with the stage it is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSource<'s> {
    pub stage: ShaderStage,
    pub text: &'s str,
}

impl<'s> ShaderSource<'s> {
    pub fn vertex(text: &'s str) -> Self {
        Self {
            stage: ShaderStage::Vertex,
            text,
        }
    }

    pub fn fragment(text: &'s str) -> Self {
        Self {
            stage: ShaderStage::Fragment,
            text,
        }
    }
}

fn non_empty(log: String) -> String {
    if log.trim().is_empty() {
        EMPTY_LOG_PLACEHOLDER.to_owned()
    } else {
        log
    }
}

/// A successfully compiled shader object, deleted on drop.
pub struct CompiledShader<'g, G: GraphicsApi + ?Sized> {
    gl: Checked<'g, G>,
    id: GLuint,
    stage: ShaderStage,
}

impl<'g, G: GraphicsApi + ?Sized> CompiledShader<'g, G> {
    pub fn compile(gl: Checked<'g, G>, source: &ShaderSource<'_>) -> Self {
        let id = gl.call("glCreateShader", |gl| gl.create_shader(source.stage));
        // Owned from here on so the object is released on every exit path.
        let shader = Self {
            gl,
            id,
            stage: source.stage,
        };

        gl.call("glShaderSource", |gl| gl.shader_source(id, source.text));
        gl.call("glCompileShader", |gl| gl.compile_shader(id));

        if !gl.call("glGetShaderiv", |gl| gl.shader_compile_status(id)) {
            let log = gl.call("glGetShaderInfoLog", |gl| gl.shader_info_log(id));
            gl.fail(HarnessError::ShaderCompile {
                stage: source.stage,
                log: non_empty(log),
            });
        }

        debug!(id, stage = %source.stage, "compiled shader");
        shader
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<G: GraphicsApi + ?Sized> Drop for CompiledShader<'_, G> {
    fn drop(&mut self) {
        let id = self.id;
        self.gl
            .release("glDeleteShader", |gl| gl.delete_shader(id));
    }
}

/// Compiles a vertex and fragment stage and links them.
pub struct ProgramBuilder<'g, G: GraphicsApi + ?Sized> {
    gl: Checked<'g, G>,
    validate: bool,
}

impl<'g, G: GraphicsApi + ?Sized> ProgramBuilder<'g, G> {
    pub fn new(gl: Checked<'g, G>) -> Self {
        Self {
            gl,
            validate: false,
        }
    }

    /// Also run `glValidateProgram` after linking.
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn build(self, vertex: &str, fragment: &str) -> LinkedProgram<'g, G> {
        let gl = self.gl;
        let vertex = CompiledShader::compile(gl, &ShaderSource::vertex(vertex));
        let fragment = CompiledShader::compile(gl, &ShaderSource::fragment(fragment));

        let id = gl.call("glCreateProgram", |gl| gl.create_program());
        let program = LinkedProgram {
            gl,
            id,
            shaders: [vertex, fragment],
        };

        for shader in &program.shaders {
            let shader_id = shader.id();
            gl.call("glAttachShader", |gl| gl.attach_shader(id, shader_id));
        }
        gl.call("glLinkProgram", |gl| gl.link_program(id));

        if !gl.call("glGetProgramiv", |gl| gl.program_link_status(id)) {
            let log = gl.call("glGetProgramInfoLog", |gl| gl.program_info_log(id));
            gl.fail(HarnessError::ProgramLink {
                log: non_empty(log),
            });
        }

        if self.validate {
            gl.call("glValidateProgram", |gl| gl.validate_program(id));
            if !gl.call("glGetProgramiv", |gl| gl.program_validate_status(id)) {
                let log = gl.call("glGetProgramInfoLog", |gl| gl.program_info_log(id));
                gl.fail(HarnessError::ProgramValidate {
                    log: non_empty(log),
                });
            }
        }

        info!(id, validated = self.validate, "linked shader program");
        program
    }
}

/// A linked program together with the two shaders attached to it.
pub struct LinkedProgram<'g, G: GraphicsApi + ?Sized> {
    gl: Checked<'g, G>,
    id: GLuint,
    shaders: [CompiledShader<'g, G>; 2],
}

impl<'g, G: GraphicsApi + ?Sized> LinkedProgram<'g, G> {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn shaders(&self) -> &[CompiledShader<'g, G>; 2] {
        &self.shaders
    }

    /// Make this the current program.
    pub fn activate(&self) {
        let id = self.id;
        self.gl.call("glUseProgram", |gl| gl.use_program(id));
    }

    /// `None` when the attribute is absent or was optimised out.
    pub fn attrib_location(&self, name: &str) -> Option<GLuint> {
        let id = self.id;
        let location: GLint = self
            .gl
            .call("glGetAttribLocation", |gl| gl.attrib_location(id, name));
        if location == NOT_FOUND {
            None
        } else {
            GLuint::try_from(location).ok()
        }
    }

    pub fn uniform_location(&self, name: &str) -> UniformLocation {
        let id = self.id;
        UniformLocation::from_raw(
            self.gl
                .call("glGetUniformLocation", |gl| gl.uniform_location(id, name)),
        )
    }
}

impl<G: GraphicsApi + ?Sized> Drop for LinkedProgram<'_, G> {
    fn drop(&mut self) {
        let id = self.id;
        self.gl
            .release("glDeleteProgram", |gl| gl.delete_program(id));
        // The attached shaders are released after the program by field drop order.
    }
}
