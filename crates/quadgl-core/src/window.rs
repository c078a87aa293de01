//! The windowing boundary as seen by the renderer.

use gl::types::GLsizei;

use crate::error::HarnessError;

/// Pixel dimensions of the drawable surface.
///
/// May differ from the logical size requested at window creation (e.g. on
/// high-density displays), so it is always queried from the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramebufferSize {
    pub width: u32,
    pub height: u32,
}

impl FramebufferSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width clamped into the signed range GL expects.
    pub fn width_i32(self) -> GLsizei {
        GLsizei::try_from(self.width).unwrap_or(GLsizei::MAX)
    }

    pub fn height_i32(self) -> GLsizei {
        GLsizei::try_from(self.height).unwrap_or(GLsizei::MAX)
    }

    /// Zero-area surfaces (minimised windows) are skipped by the renderer.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for FramebufferSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// A window with a current graphics context.
pub trait WindowHost {
    fn framebuffer_size(&self) -> FramebufferSize;

    /// Whether the close signal has been raised. Polled, never pushed.
    fn should_close(&self) -> bool;

    /// Process pending window-system events. With `wait` set, block until at
    /// least one event arrives; otherwise return immediately.
    fn poll_events(&mut self, wait: bool);

    fn swap_buffers(&mut self) -> Result<(), HarnessError>;
}

impl<W: WindowHost + ?Sized> WindowHost for &mut W {
    fn framebuffer_size(&self) -> FramebufferSize {
        (**self).framebuffer_size()
    }

    fn should_close(&self) -> bool {
        (**self).should_close()
    }

    fn poll_events(&mut self, wait: bool) {
        (**self).poll_events(wait)
    }

    fn swap_buffers(&mut self) -> Result<(), HarnessError> {
        (**self).swap_buffers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_dimensions_saturate() {
        let size = FramebufferSize::new(u32::MAX, 480);
        assert_eq!(size.width_i32(), i32::MAX);
        assert_eq!(size.height_i32(), 480);
    }

    #[test]
    fn zero_area_is_empty() {
        assert!(FramebufferSize::new(0, 480).is_empty());
        assert!(!FramebufferSize::from((640, 480)).is_empty());
    }
}
