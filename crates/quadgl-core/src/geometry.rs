//! Static vertex data and its attribute layout.

use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use gl::types::{GLenum, GLint, GLsizei, GLuint};
use tracing::{debug, warn};

use crate::api::GraphicsApi;
use crate::checked::Checked;
use crate::error::{GlError, GlErrorCode, HarnessError};
use crate::shader::LinkedProgram;

/// How one named attribute is laid out inside a vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub components: GLint,
    pub kind: GLenum,
    pub normalized: bool,
    pub stride: GLsizei,
    pub offset: usize,
}

impl VertexAttribute {
    /// Describe field `F` of vertex type `V` found at byte `offset`.
    pub fn of<V: Vertex, F: AttributeComponents>(name: &'static str, offset: usize) -> Self {
        debug_assert!(offset + size_of::<F>() <= size_of::<V>());
        Self {
            name,
            components: F::COMPONENTS,
            kind: F::KIND,
            normalized: false,
            stride: size_of::<V>() as GLsizei,
            offset,
        }
    }
}

/// Maps a field type to the component count and scalar type GL reads.
pub trait AttributeComponents: Pod {
    const COMPONENTS: GLint;
    const KIND: GLenum;
}

impl AttributeComponents for f32 {
    const COMPONENTS: GLint = 1;
    const KIND: GLenum = gl::FLOAT;
}

impl<const N: usize> AttributeComponents for [f32; N] {
    const COMPONENTS: GLint = N as GLint;
    const KIND: GLenum = gl::FLOAT;
}

/// A vertex record that can be uploaded verbatim.
pub trait Vertex: Pod {
    fn attributes() -> Vec<VertexAttribute>;
}

/// A position in normalized device coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }
}

impl Vertex for QuadVertex {
    fn attributes() -> Vec<VertexAttribute> {
        vec![VertexAttribute::of::<Self, [f32; 2]>(
            "vPos",
            offset_of!(Self, position),
        )]
    }
}

/// Two triangles covering the whole `[-1, 1] x [-1, 1]` viewport, sharing the
/// bottom-left to top-right diagonal.
pub const FULLSCREEN_QUAD: [QuadVertex; 6] = [
    QuadVertex::new(-1.0, -1.0),
    QuadVertex::new(1.0, -1.0),
    QuadVertex::new(1.0, 1.0),
    QuadVertex::new(-1.0, -1.0),
    QuadVertex::new(1.0, 1.0),
    QuadVertex::new(-1.0, 1.0),
];

/// Vertices uploaded once into a `STATIC_DRAW` buffer, with their attribute
/// pointers recorded against a linked program.
pub struct GeometryBuffer<'g, G: GraphicsApi + ?Sized> {
    gl: Checked<'g, G>,
    vao: GLuint,
    vbo: GLuint,
    vertex_count: GLsizei,
    layout: Vec<VertexAttribute>,
}

impl<'g, G: GraphicsApi + ?Sized> GeometryBuffer<'g, G> {
    /// Upload `vertices` and describe their layout to `program`.
    ///
    /// Attributes the program does not expose are skipped. More vertices than
    /// `GLsizei` can count is fatal.
    pub fn upload<V: Vertex>(
        gl: Checked<'g, G>,
        program: &LinkedProgram<'g, G>,
        vertices: &[V],
    ) -> Self {
        let Ok(vertex_count) = GLsizei::try_from(vertices.len()) else {
            gl.fail(HarnessError::Graphics(GlError {
                code: GlErrorCode::InvalidValue,
                op: "glBufferData",
            }));
        };

        let vao = gl.call("glGenVertexArrays", |gl| gl.create_vertex_array());
        gl.call("glBindVertexArray", |gl| gl.bind_vertex_array(vao));

        let vbo = gl.call("glGenBuffers", |gl| gl.create_buffer());
        let buffer = Self {
            gl,
            vao,
            vbo,
            vertex_count,
            layout: V::attributes(),
        };

        gl.call("glBindBuffer", |gl| gl.bind_array_buffer(vbo));
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        gl.call("glBufferData", |gl| gl.buffer_data_static(bytes));

        for attribute in &buffer.layout {
            let Some(index) = program.attrib_location(attribute.name) else {
                warn!(name = attribute.name, "attribute not active in program; skipping");
                continue;
            };
            gl.call("glEnableVertexAttribArray", |gl| {
                gl.enable_vertex_attrib_array(index)
            });
            gl.call("glVertexAttribPointer", |gl| {
                gl.vertex_attrib_pointer(index, attribute)
            });
        }

        debug!(vao, vbo, vertices = vertices.len(), bytes = bytes.len(), "uploaded geometry");
        buffer
    }

    pub fn vertex_count(&self) -> GLsizei {
        self.vertex_count
    }

    pub fn layout(&self) -> &[VertexAttribute] {
        &self.layout
    }

    /// Draw every vertex as a list of triangles.
    pub fn draw(&self) {
        let (vao, count) = (self.vao, self.vertex_count);
        self.gl
            .call("glBindVertexArray", |gl| gl.bind_vertex_array(vao));
        self.gl
            .call("glDrawArrays", |gl| gl.draw_arrays(gl::TRIANGLES, 0, count));
    }
}

impl<G: GraphicsApi + ?Sized> Drop for GeometryBuffer<'_, G> {
    fn drop(&mut self) {
        let (vao, vbo) = (self.vao, self.vbo);
        self.gl
            .release("glDeleteBuffers", |gl| gl.delete_buffer(vbo));
        if vao != 0 {
            self.gl
                .release("glDeleteVertexArrays", |gl| gl.delete_vertex_array(vao));
        }
    }
}
