//! The frame renderer and its event loop.
//!
//! ```text
//! Uninitialized -> Ready -> Rendered -> Closing -> Terminated
//! ```
//!
//! The first frame is always drawn. Afterwards the loop pumps events until
//! the close signal is raised, redrawing after each poll only under
//! [`RenderPolicy::PerFrame`] or while no frame has been drawn yet (a
//! zero-area framebuffer skips the draw).

use std::fmt;

use tracing::{debug, info};

use crate::api::GraphicsApi;
use crate::checked::Checked;
use crate::config::RenderPolicy;
use crate::error::HarnessError;
use crate::geometry::GeometryBuffer;
use crate::shader::LinkedProgram;
use crate::uniform::{UniformBinder, UniformSource};
use crate::window::{FramebufferSize, WindowHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    Uninitialized,
    Ready,
    Rendered,
    Closing,
    Terminated,
}

impl fmt::Display for RendererState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Everything one draw needs: a program, its geometry and uniforms.
pub struct Scene<'g, G: GraphicsApi + ?Sized> {
    program: LinkedProgram<'g, G>,
    geometry: GeometryBuffer<'g, G>,
    uniforms: UniformBinder<'g, G>,
    source: Box<dyn UniformSource + 'g>,
}

impl<'g, G: GraphicsApi + ?Sized> Scene<'g, G> {
    pub fn new(
        program: LinkedProgram<'g, G>,
        geometry: GeometryBuffer<'g, G>,
        uniforms: UniformBinder<'g, G>,
        source: impl UniformSource + 'g,
    ) -> Self {
        Self {
            program,
            geometry,
            uniforms,
            source: Box::new(source),
        }
    }

    pub fn program(&self) -> &LinkedProgram<'g, G> {
        &self.program
    }

    pub fn uniforms(&self) -> &UniformBinder<'g, G> {
        &self.uniforms
    }
}

/// Outcome of [`FrameRenderer::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_drawn: u64,
    pub polls: u64,
    pub last_size: FramebufferSize,
}

pub struct FrameRenderer<'g, G: GraphicsApi + ?Sized, W: WindowHost> {
    gl: Checked<'g, G>,
    window: W,
    policy: RenderPolicy,
    clear_color: [f32; 4],
    state: RendererState,
    frames_drawn: u64,
    polls: u64,
    last_size: FramebufferSize,
}

impl<'g, G: GraphicsApi + ?Sized, W: WindowHost> FrameRenderer<'g, G, W> {
    /// Take over a window whose graphics context is current.
    pub fn new(gl: Checked<'g, G>, window: W, policy: RenderPolicy) -> Self {
        let mut renderer = Self {
            gl,
            window,
            policy,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            state: RendererState::Uninitialized,
            frames_drawn: 0,
            polls: 0,
            last_size: FramebufferSize::default(),
        };
        renderer.transition(RendererState::Ready);
        renderer
    }

    pub fn with_clear_color(mut self, rgba: [f32; 4]) -> Self {
        self.clear_color = rgba;
        self
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    fn transition(&mut self, to: RendererState) {
        info!(from = %self.state, %to, "renderer state");
        self.state = to;
    }

    /// Draw one frame of `scene` and present it.
    ///
    /// Zero-area framebuffers are skipped without drawing.
    pub fn render(&mut self, scene: &mut Scene<'g, G>) -> Result<(), HarnessError> {
        debug_assert!(matches!(
            self.state,
            RendererState::Ready | RendererState::Rendered
        ));

        let size = self.window.framebuffer_size();
        if size != self.last_size {
            debug!(width = size.width, height = size.height, "framebuffer size");
            self.last_size = size;
        }
        if size.is_empty() {
            debug!("framebuffer has no area; skipping frame");
            return Ok(());
        }

        let (width, height) = (size.width_i32(), size.height_i32());
        let rgba = self.clear_color;
        self.gl
            .call("glViewport", |gl| gl.viewport(0, 0, width, height));
        self.gl.call("glClearColor", |gl| gl.clear_color(rgba));
        self.gl
            .call("glClear", |gl| gl.clear(gl::COLOR_BUFFER_BIT));

        let values = scene.source.values(size);
        scene.uniforms.apply(&scene.program, &values);
        scene.geometry.draw();

        self.window.swap_buffers()?;
        self.frames_drawn += 1;

        if self.state == RendererState::Ready {
            self.transition(RendererState::Rendered);
        }
        Ok(())
    }

    /// Draw the first frame, then pump events until the window asks to close.
    ///
    /// `scene` is released before returning.
    pub fn run(mut self, mut scene: Scene<'g, G>) -> Result<RunSummary, HarnessError> {
        info!(policy = %self.policy, "starting event loop");
        self.render(&mut scene)?;

        loop {
            // Render-once keeps trying until a frame actually lands, e.g. when
            // the window starts minimised.
            let redraw = self.policy == RenderPolicy::PerFrame || self.frames_drawn == 0;
            // Nothing is presented until an event arrives, so block on the pump.
            let wait = !redraw || self.last_size.is_empty();

            self.window.poll_events(wait);
            self.polls += 1;

            if redraw {
                self.render(&mut scene)?;
            }

            if self.window.should_close() {
                break;
            }
        }

        self.transition(RendererState::Closing);
        drop(scene);
        self.transition(RendererState::Terminated);

        Ok(RunSummary {
            frames_drawn: self.frames_drawn,
            polls: self.polls,
            last_size: self.last_size,
        })
    }
}
