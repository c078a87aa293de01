//! A single-pass OpenGL rendering harness.
//!
//! The harness builds a shader program, uploads static geometry, binds
//! uniforms from the framebuffer size and draws, then pumps window events
//! until the window is closed. Every graphics call is checked and any error is
//! fatal.
//!
//! # Overview
//!
//! - [`GraphicsApi`] is the raw graphics boundary; [`WindowHost`] the
//!   windowing boundary. Production implementations live in `quadgl-glutin`.
//! - [`Checked`] wraps each call with an error-flag query and fail-fast policy.
//! - [`ProgramBuilder`] compiles and links a [`LinkedProgram`].
//! - [`GeometryBuffer`] uploads a [`Vertex`] list such as [`FULLSCREEN_QUAD`].
//! - [`UniformBinder`] resolves uniform locations and pushes values.
//! - [`FrameRenderer`] draws a [`Scene`] and runs the event loop under a
//!   [`RenderPolicy`].

pub mod api;
pub mod checked;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod renderer;
pub mod shader;
pub mod uniform;
pub mod window;

#[cfg(test)]
mod testing;

// Re-export primary types at crate root for convenience.
pub use api::GraphicsApi;
pub use checked::{check_error, terminate, Checked, FatalHandler};
pub use config::{HarnessConfig, RenderPolicy, WindowConfig};
pub use error::{GlError, GlErrorCode, HarnessError};
pub use geometry::{
    AttributeComponents, GeometryBuffer, QuadVertex, Vertex, VertexAttribute, FULLSCREEN_QUAD,
};
pub use logging::init_tracing;
pub use renderer::{FrameRenderer, RendererState, RunSummary, Scene};
pub use shader::{CompiledShader, LinkedProgram, ProgramBuilder, ShaderSource, ShaderStage};
pub use uniform::{
    FramebufferExtent, IdentityTransform, UniformBinder, UniformLocation, UniformSource,
    UniformValue,
};
pub use window::{FramebufferSize, WindowHost};
