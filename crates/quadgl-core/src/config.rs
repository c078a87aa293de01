//! Harness configuration.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// What the event loop does after the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPolicy {
    /// Draw once, then only pump events.
    #[default]
    Once,
    /// Redraw after every event poll.
    PerFrame,
}

#[derive(Debug, Error)]
#[error("unknown render policy `{0}` (expected `once` or `per-frame`)")]
pub struct ParsePolicyError(String);

impl FromStr for RenderPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "once" | "render-once" => Ok(Self::Once),
            "per-frame" | "render-per-frame" => Ok(Self::PerFrame),
            _ => Err(ParsePolicyError(s.to_owned())),
        }
    }
}

impl fmt::Display for RenderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Once => f.write_str("once"),
            Self::PerFrame => f.write_str("per-frame"),
        }
    }
}

/// The window requested from the windowing boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    /// Requested logical width. The framebuffer may be larger.
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Wait for vertical blank on swap.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "quadgl".to_owned(),
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub window: WindowConfig,
    pub policy: RenderPolicy,
    pub clear_color: [f32; 4],
    /// Run `glValidateProgram` after linking.
    pub validate_program: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            policy: RenderPolicy::Once,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            validate_program: false,
        }
    }
}
