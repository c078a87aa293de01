//! [`GraphicsApi`] over the `gl` crate's global function pointers.

use std::ffi::{c_void, CString};
use std::marker::PhantomData;
use std::sync::Once;

use gl::types::{GLbitfield, GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use quadgl_core::api::NOT_FOUND;
use quadgl_core::{GraphicsApi, ShaderStage, VertexAttribute};

pub(crate) static GL_LOAD_ONCE: Once = Once::new();

/// Raw OpenGL entry points of the current context.
///
/// Not `Send`: GL calls must stay on the thread that owns the context.
#[derive(Debug)]
pub struct RawGl {
    _not_send: PhantomData<*const ()>,
}

impl RawGl {
    /// Load GL function pointers through `loader`.
    ///
    /// Pointers are loaded exactly once per process.
    ///
    /// # Safety
    ///
    /// A GL context must be current on this thread for as long as the
    /// returned value is used, and `loader` must return addresses valid for
    /// that context.
    pub unsafe fn load(loader: impl FnMut(&str) -> *const c_void) -> Self {
        let mut loader = Some(loader);
        GL_LOAD_ONCE.call_once(|| {
            if let Some(loader) = loader.take() {
                gl::load_with(loader);
            }
        });

        Self {
            _not_send: PhantomData,
        }
    }

    fn c_name(name: &str) -> Option<CString> {
        CString::new(name).ok()
    }
}

fn read_log(
    object: GLuint,
    get_iv: unsafe fn(GLuint, GLenum, *mut GLint),
    get_log: unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    unsafe {
        let mut len: GLint = 0;
        get_iv(object, gl::INFO_LOG_LENGTH, &mut len);
        if len <= 0 {
            return String::new();
        }

        let mut buf = vec![0u8; len as usize];
        let mut written: GLsizei = 0;
        get_log(object, len, &mut written, buf.as_mut_ptr().cast());
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn status(object: GLuint, get_iv: unsafe fn(GLuint, GLenum, *mut GLint), pname: GLenum) -> bool {
    let mut value: GLint = 0;
    unsafe { get_iv(object, pname, &mut value) };
    value == GLint::from(gl::TRUE)
}

impl GraphicsApi for RawGl {
    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }

    fn create_buffer(&self) -> GLuint {
        let mut buffer = 0;
        unsafe { gl::GenBuffers(1, &mut buffer) };
        buffer
    }

    fn bind_array_buffer(&self, buffer: GLuint) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, buffer) }
    }

    fn buffer_data_static(&self, data: &[u8]) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
                gl::STATIC_DRAW,
            )
        }
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn create_vertex_array(&self) -> GLuint {
        if !gl::GenVertexArrays::is_loaded() {
            return 0;
        }
        let mut vao = 0;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        vao
    }

    fn bind_vertex_array(&self, vao: GLuint) {
        if gl::BindVertexArray::is_loaded() {
            unsafe { gl::BindVertexArray(vao) }
        }
    }

    fn delete_vertex_array(&self, vao: GLuint) {
        if gl::DeleteVertexArrays::is_loaded() {
            unsafe { gl::DeleteVertexArrays(1, &vao) }
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        let ptr = source.as_ptr().cast::<GLchar>();
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader, 1, &ptr, &len) }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        status(shader, gl::GetShaderiv, gl::COMPILE_STATUS)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        read_log(shader, gl::GetShaderiv, gl::GetShaderInfoLog)
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        status(program, gl::GetProgramiv, gl::LINK_STATUS)
    }

    fn validate_program(&self, program: GLuint) {
        unsafe { gl::ValidateProgram(program) }
    }

    fn program_validate_status(&self, program: GLuint) -> bool {
        status(program, gl::GetProgramiv, gl::VALIDATE_STATUS)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        read_log(program, gl::GetProgramiv, gl::GetProgramInfoLog)
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
        match Self::c_name(name) {
            Some(name) => unsafe { gl::GetAttribLocation(program, name.as_ptr()) },
            None => NOT_FOUND,
        }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        match Self::c_name(name) {
            Some(name) => unsafe { gl::GetUniformLocation(program, name.as_ptr()) },
            None => NOT_FOUND,
        }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn vertex_attrib_pointer(&self, index: GLuint, attribute: &VertexAttribute) {
        let normalized = if attribute.normalized {
            gl::TRUE
        } else {
            gl::FALSE
        };
        unsafe {
            gl::VertexAttribPointer(
                index,
                attribute.components,
                attribute.kind,
                normalized,
                attribute.stride,
                // Byte offset into the bound array buffer.
                attribute.offset as *const c_void,
            )
        }
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) }
    }

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(mode, first, count) }
    }
}
