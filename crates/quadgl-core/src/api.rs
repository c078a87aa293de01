//! The graphics boundary consumed by the harness.
//!
//! Methods map one-to-one onto the GL entry points they are named after and
//! carry no policy of their own. Error checking is layered on top by
//! [`Checked`](crate::checked::Checked).

use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

use crate::geometry::VertexAttribute;
use crate::shader::ShaderStage;

/// Location returned by attribute/uniform lookups for names the program does
/// not expose.
pub const NOT_FOUND: GLint = -1;

/// Raw graphics entry points.
///
/// Implementations assume a single thread with the graphics context current
/// for the lifetime of the value.
pub trait GraphicsApi {
    /// Query and clear the sticky error flag.
    fn get_error(&self) -> GLenum;

    fn create_buffer(&self) -> GLuint;
    fn bind_array_buffer(&self, buffer: GLuint);
    /// Upload `data` into the bound array buffer with `STATIC_DRAW` usage.
    fn buffer_data_static(&self, data: &[u8]);
    fn delete_buffer(&self, buffer: GLuint);

    /// Returns `0` when the context has no vertex array objects.
    fn create_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, vao: GLuint);
    fn delete_vertex_array(&self, vao: GLuint);

    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn validate_program(&self, program: GLuint);
    fn program_validate_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);

    /// Returns [`NOT_FOUND`] for inactive or unknown attributes.
    fn attrib_location(&self, program: GLuint, name: &str) -> GLint;
    /// Returns [`NOT_FOUND`] for inactive or unknown uniforms.
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;

    fn enable_vertex_attrib_array(&self, index: GLuint);
    fn vertex_attrib_pointer(&self, index: GLuint, attribute: &VertexAttribute);

    fn uniform_1i(&self, location: GLint, value: GLint);
    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]);

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn clear_color(&self, rgba: [f32; 4]);
    fn clear(&self, mask: GLbitfield);
    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei);
}
