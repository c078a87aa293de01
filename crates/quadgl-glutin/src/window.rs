//! A winit window with a current glutin GL context.

use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Duration;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{ContextAttributesBuilder, PossiblyCurrentContext};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::prelude::NotCurrentGlContext;
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use quadgl_core::{FramebufferSize, HarnessError, WindowConfig, WindowHost};
use raw_window_handle::HasWindowHandle;
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::raw_gl::RawGl;

/// Collects the events the harness cares about during one pump.
#[derive(Debug, Default)]
struct EventPump {
    close_requested: bool,
    resized: Option<PhysicalSize<u32>>,
}

impl ApplicationHandler for EventPump {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        // The window is created up front in `GlutinWindow::open`.
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => self.resized = Some(size),
            _ => {}
        }
    }
}

/// Picks the config with the most multisample buffers.
///
/// glutin only calls the picker with a non-empty set; an empty match fails
/// `DisplayBuilder::build` instead.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, config| {
            if config.num_samples() > best.num_samples() {
                config
            } else {
                best
            }
        })
        .expect("display builder passes at least one matching config")
}

/// The production windowing boundary.
pub struct GlutinWindow {
    // Drop order: surface and context go before the window they render into.
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
    event_loop: EventLoop<()>,
    pump: EventPump,
}

impl GlutinWindow {
    /// Create the window, make its GL context current and load GL.
    ///
    /// The requested size is logical; query
    /// [`framebuffer_size`](WindowHost::framebuffer_size) for pixels.
    pub fn open(config: &WindowConfig) -> Result<(Self, RawGl), HarnessError> {
        let event_loop =
            EventLoop::new().map_err(|e| HarnessError::WindowingInit(e.to_string()))?;

        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(&event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|e| HarnessError::WindowCreation(e.to_string()))?;
        let window = window.ok_or_else(|| {
            HarnessError::WindowCreation("display builder returned no window".to_owned())
        })?;

        let raw_handle = window
            .window_handle()
            .map_err(|e| HarnessError::WindowCreation(e.to_string()))?
            .as_raw();
        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new().build(Some(raw_handle));

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| HarnessError::WindowCreation(format!("GL context: {e}")))?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|e| HarnessError::WindowCreation(e.to_string()))?;
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| HarnessError::WindowCreation(format!("GL surface: {e}")))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| HarnessError::WindowCreation(format!("make current: {e}")))?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            warn!(%err, vsync = config.vsync, "could not set swap interval");
        }

        // SAFETY: the context was just made current on this thread and lives
        // in the returned window, which outlives every use of `RawGl` in the
        // harness.
        let gl = unsafe {
            RawGl::load(|symbol| match CString::new(symbol) {
                Ok(symbol) => gl_display.get_proc_address(&symbol),
                Err(_) => std::ptr::null(),
            })
        };

        let size = window.inner_size();
        info!(
            title = %config.title,
            requested_width = config.width,
            requested_height = config.height,
            framebuffer_width = size.width,
            framebuffer_height = size.height,
            "window created"
        );

        Ok((
            Self {
                surface,
                context,
                window,
                event_loop,
                pump: EventPump::default(),
            },
            gl,
        ))
    }

}

impl WindowHost for GlutinWindow {
    fn framebuffer_size(&self) -> FramebufferSize {
        let size = self.window.inner_size();
        FramebufferSize::new(size.width, size.height)
    }

    fn should_close(&self) -> bool {
        self.pump.close_requested
    }

    fn poll_events(&mut self, wait: bool) {
        let timeout = if wait { None } else { Some(Duration::ZERO) };
        let status = self.event_loop.pump_app_events(timeout, &mut self.pump);
        if let PumpStatus::Exit(code) = status {
            debug!(code, "event loop exited");
            self.pump.close_requested = true;
        }

        if let Some(size) = self.pump.resized.take() {
            if let (Some(width), Some(height)) =
                (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
            {
                debug!(width = size.width, height = size.height, "resizing surface");
                self.surface.resize(&self.context, width, height);
            }
        }
    }

    fn swap_buffers(&mut self) -> Result<(), HarnessError> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| HarnessError::Present(e.to_string()))
    }
}

impl Drop for GlutinWindow {
    fn drop(&mut self) {
        info!("destroying window");
    }
}
