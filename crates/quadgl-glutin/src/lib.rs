//! Production boundaries for `quadgl-core`.
//!
//! - [`GlutinWindow`] creates a winit window with a current glutin context
//!   and implements [`WindowHost`](quadgl_core::WindowHost) by pumping the
//!   event loop without blocking.
//! - [`RawGl`] implements [`GraphicsApi`](quadgl_core::GraphicsApi) with the
//!   `gl` crate, loaded once from the context's proc address table.
//!
//! ### Warning
//!
//! Both values must stay on the thread that created them. `RawGl` must not be
//! used after its `GlutinWindow` is dropped.

mod raw_gl;
mod window;

pub use raw_gl::RawGl;
pub use window::GlutinWindow;
