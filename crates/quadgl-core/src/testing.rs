//! In-memory doubles for the graphics and windowing boundaries.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

use crate::api::{GraphicsApi, NOT_FOUND};
use crate::checked::Checked;
use crate::error::HarnessError;
use crate::geometry::VertexAttribute;
use crate::shader::ShaderStage;
use crate::window::{FramebufferSize, WindowHost};

pub fn panic_on_fatal(err: &HarnessError) -> ! {
    panic!("{err}")
}

/// `gl` with a fatal handler that panics instead of exiting.
pub fn checked(gl: &RecordingGl) -> Checked<'_, RecordingGl> {
    Checked::with_fatal_handler(gl, panic_on_fatal)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBuffer(GLuint),
    BindArrayBuffer(GLuint),
    BufferData(Vec<u8>),
    DeleteBuffer(GLuint),
    CreateVertexArray(GLuint),
    BindVertexArray(GLuint),
    DeleteVertexArray(GLuint),
    CreateShader(ShaderStage, GLuint),
    ShaderSource(GLuint, String),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    ValidateProgram(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    AttribLocation(GLuint, String),
    UniformLocation(GLuint, String),
    EnableVertexAttribArray(GLuint),
    VertexAttribPointer(GLuint, VertexAttribute),
    Uniform1i(GLint, GLint),
    UniformMatrix4(GLint, [f32; 16]),
    Viewport(GLint, GLint, GLsizei, GLsizei),
    ClearColor([f32; 4]),
    Clear(GLbitfield),
    DrawArrays(GLenum, GLint, GLsizei),
}

/// Records every call and models the sticky error flag.
///
/// Uniforms and attributes listed at construction are "active"; their
/// locations are their indices in the list.
#[derive(Default)]
pub struct RecordingGl {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<GLuint>,
    error: Cell<GLenum>,
    error_queries: Cell<usize>,
    injected: RefCell<HashMap<&'static str, GLenum>>,
    shader_stages: RefCell<HashMap<GLuint, ShaderStage>>,
    compile_failure: RefCell<Option<(ShaderStage, String)>>,
    link_failure: RefCell<Option<String>>,
    validate_failure: RefCell<Option<String>>,
    uniforms: Vec<&'static str>,
    attributes: Vec<&'static str>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniforms(mut self, names: &[&'static str]) -> Self {
        self.uniforms = names.to_vec();
        self
    }

    pub fn with_attributes(mut self, names: &[&'static str]) -> Self {
        self.attributes = names.to_vec();
        self
    }

    /// Raise `code` the next time the method named `method` runs.
    pub fn inject_error(&self, method: &'static str, code: GLenum) {
        self.injected.borrow_mut().insert(method, code);
    }

    pub fn fail_compile(&self, stage: ShaderStage, log: &str) {
        *self.compile_failure.borrow_mut() = Some((stage, log.to_owned()));
    }

    pub fn fail_link(&self, log: &str) {
        *self.link_failure.borrow_mut() = Some(log.to_owned());
    }

    pub fn fail_validate(&self, log: &str) {
        *self.validate_failure.borrow_mut() = Some(log.to_owned());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn error_queries(&self) -> usize {
        self.error_queries.get()
    }

    pub fn draws(&self) -> Vec<(GLenum, GLint, GLsizei)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match *c {
                Call::DrawArrays(mode, first, count) => Some((mode, first, count)),
                _ => None,
            })
            .collect()
    }

    pub fn pushed_ints(&self) -> Vec<(GLint, GLint)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match *c {
                Call::Uniform1i(location, value) => Some((location, value)),
                _ => None,
            })
            .collect()
    }

    pub fn viewports(&self) -> Vec<(GLint, GLint, GLsizei, GLsizei)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match *c {
                Call::Viewport(x, y, w, h) => Some((x, y, w, h)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, method: &'static str, call: Call) {
        self.calls.borrow_mut().push(call);
        if let Some(code) = self.injected.borrow_mut().remove(method) {
            self.error.set(code);
        }
    }

    fn fresh_id(&self) -> GLuint {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn location_of(names: &[&'static str], name: &str) -> GLint {
        names
            .iter()
            .position(|n| *n == name)
            .map_or(NOT_FOUND, |i| i as GLint)
    }
}

impl GraphicsApi for RecordingGl {
    fn get_error(&self) -> GLenum {
        self.error_queries.set(self.error_queries.get() + 1);
        self.error.replace(gl::NO_ERROR)
    }

    fn create_buffer(&self) -> GLuint {
        let id = self.fresh_id();
        self.record("create_buffer", Call::CreateBuffer(id));
        id
    }

    fn bind_array_buffer(&self, buffer: GLuint) {
        self.record("bind_array_buffer", Call::BindArrayBuffer(buffer));
    }

    fn buffer_data_static(&self, data: &[u8]) {
        self.record("buffer_data_static", Call::BufferData(data.to_vec()));
    }

    fn delete_buffer(&self, buffer: GLuint) {
        self.record("delete_buffer", Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> GLuint {
        let id = self.fresh_id();
        self.record("create_vertex_array", Call::CreateVertexArray(id));
        id
    }

    fn bind_vertex_array(&self, vao: GLuint) {
        self.record("bind_vertex_array", Call::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: GLuint) {
        self.record("delete_vertex_array", Call::DeleteVertexArray(vao));
    }

    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        let id = self.fresh_id();
        self.shader_stages.borrow_mut().insert(id, stage);
        self.record("create_shader", Call::CreateShader(stage, id));
        id
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        self.record("shader_source", Call::ShaderSource(shader, source.to_owned()));
    }

    fn compile_shader(&self, shader: GLuint) {
        self.record("compile_shader", Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let stage = self.shader_stages.borrow().get(&shader).copied();
        !matches!(
            (&*self.compile_failure.borrow(), stage),
            (Some((failing, _)), Some(stage)) if *failing == stage
        )
    }

    fn shader_info_log(&self, _shader: GLuint) -> String {
        self.compile_failure
            .borrow()
            .as_ref()
            .map(|(_, log)| log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: GLuint) {
        self.record("delete_shader", Call::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let id = self.fresh_id();
        self.record("create_program", Call::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record("attach_shader", Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) {
        self.record("link_program", Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: GLuint) -> bool {
        self.link_failure.borrow().is_none()
    }

    fn validate_program(&self, program: GLuint) {
        self.record("validate_program", Call::ValidateProgram(program));
    }

    fn program_validate_status(&self, _program: GLuint) -> bool {
        self.validate_failure.borrow().is_none()
    }

    fn program_info_log(&self, _program: GLuint) -> String {
        self.link_failure
            .borrow()
            .clone()
            .or_else(|| self.validate_failure.borrow().clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: GLuint) {
        self.record("use_program", Call::UseProgram(program));
    }

    fn delete_program(&self, program: GLuint) {
        self.record("delete_program", Call::DeleteProgram(program));
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
        self.record("attrib_location", Call::AttribLocation(program, name.to_owned()));
        Self::location_of(&self.attributes, name)
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        self.record("uniform_location", Call::UniformLocation(program, name.to_owned()));
        Self::location_of(&self.uniforms, name)
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.record("enable_vertex_attrib_array", Call::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer(&self, index: GLuint, attribute: &VertexAttribute) {
        self.record(
            "vertex_attrib_pointer",
            Call::VertexAttribPointer(index, *attribute),
        );
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        self.record("uniform_1i", Call::Uniform1i(location, value));
    }

    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]) {
        self.record("uniform_matrix4", Call::UniformMatrix4(location, *value));
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.record("viewport", Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record("clear_color", Call::ClearColor(rgba));
    }

    fn clear(&self, mask: GLbitfield) {
        self.record("clear", Call::Clear(mask));
    }

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei) {
        self.record("draw_arrays", Call::DrawArrays(mode, first, count));
    }
}

/// A window that raises the close signal after a fixed number of polls.
pub struct FakeWindow {
    size: FramebufferSize,
    close_after: Option<u64>,
    resize: Option<(u64, FramebufferSize)>,
    swap_error: Option<String>,
    polls: u64,
    swaps: u64,
    waits: Vec<bool>,
}

impl FakeWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: FramebufferSize::new(width, height),
            close_after: None,
            resize: None,
            swap_error: None,
            polls: 0,
            swaps: 0,
            waits: Vec::new(),
        }
    }

    pub fn close_after_polls(mut self, polls: u64) -> Self {
        self.close_after = Some(polls);
        self
    }

    pub fn resize_on_poll(mut self, poll: u64, width: u32, height: u32) -> Self {
        self.resize = Some((poll, FramebufferSize::new(width, height)));
        self
    }

    pub fn fail_swap(mut self, message: &str) -> Self {
        self.swap_error = Some(message.to_owned());
        self
    }

    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// The `wait` flag of every poll, in order.
    pub fn waits(&self) -> Vec<bool> {
        self.waits.clone()
    }
}

impl WindowHost for FakeWindow {
    fn framebuffer_size(&self) -> FramebufferSize {
        self.size
    }

    fn should_close(&self) -> bool {
        self.close_after.is_some_and(|n| self.polls >= n)
    }

    fn poll_events(&mut self, wait: bool) {
        self.waits.push(wait);
        self.polls += 1;
        if let Some((poll, size)) = self.resize {
            if poll == self.polls {
                self.size = size;
            }
        }
    }

    fn swap_buffers(&mut self) -> Result<(), HarnessError> {
        if let Some(message) = &self.swap_error {
            return Err(HarnessError::Present(message.clone()));
        }
        self.swaps += 1;
        Ok(())
    }
}
