//! Error taxonomy for the harness.
//!
//! Windowing failures are ordinary errors returned to the caller. Everything
//! raised by the graphics boundary is escalated through
//! [`Checked::fail`](crate::checked::Checked::fail) and never returns.

use std::fmt;

use gl::types::GLenum;
use thiserror::Error;

use crate::shader::ShaderStage;

/// Symbolic form of a `glGetError` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlErrorCode {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    StackOverflow,
    StackUnderflow,
    OutOfMemory,
    InvalidFramebufferOperation,
    ContextLost,
    Unknown(GLenum),
}

impl GlErrorCode {
    /// Map a raw, non-zero error code to its symbolic form.
    pub fn from_raw(code: GLenum) -> Self {
        match code {
            gl::INVALID_ENUM => Self::InvalidEnum,
            gl::INVALID_VALUE => Self::InvalidValue,
            gl::INVALID_OPERATION => Self::InvalidOperation,
            gl::STACK_OVERFLOW => Self::StackOverflow,
            gl::STACK_UNDERFLOW => Self::StackUnderflow,
            gl::OUT_OF_MEMORY => Self::OutOfMemory,
            gl::INVALID_FRAMEBUFFER_OPERATION => Self::InvalidFramebufferOperation,
            gl::CONTEXT_LOST => Self::ContextLost,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(self) -> GLenum {
        match self {
            Self::InvalidEnum => gl::INVALID_ENUM,
            Self::InvalidValue => gl::INVALID_VALUE,
            Self::InvalidOperation => gl::INVALID_OPERATION,
            Self::StackOverflow => gl::STACK_OVERFLOW,
            Self::StackUnderflow => gl::STACK_UNDERFLOW,
            Self::OutOfMemory => gl::OUT_OF_MEMORY,
            Self::InvalidFramebufferOperation => gl::INVALID_FRAMEBUFFER_OPERATION,
            Self::ContextLost => gl::CONTEXT_LOST,
            Self::Unknown(code) => code,
        }
    }

    /// Human-readable name, e.g. `GL_INVALID_OPERATION`.
    pub fn name(self) -> &'static str {
        match self {
            Self::InvalidEnum => "GL_INVALID_ENUM",
            Self::InvalidValue => "GL_INVALID_VALUE",
            Self::InvalidOperation => "GL_INVALID_OPERATION",
            Self::StackOverflow => "GL_STACK_OVERFLOW",
            Self::StackUnderflow => "GL_STACK_UNDERFLOW",
            Self::OutOfMemory => "GL_OUT_OF_MEMORY",
            Self::InvalidFramebufferOperation => "GL_INVALID_FRAMEBUFFER_OPERATION",
            Self::ContextLost => "GL_CONTEXT_LOST",
            Self::Unknown(_) => "unknown GL error",
        }
    }
}

impl fmt::Display for GlErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.name(), self.raw())
    }
}

/// A non-zero error state observed right after `op` executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{code} after {op}")]
pub struct GlError {
    pub code: GlErrorCode,
    pub op: &'static str,
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("windowing system failed to initialise: {0}")]
    WindowingInit(String),

    #[error("window creation failed: {0}")]
    WindowCreation(String),

    #[error(transparent)]
    Graphics(#[from] GlError),

    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("program failed to link:\n{log}")]
    ProgramLink { log: String },

    #[error("program failed validation:\n{log}")]
    ProgramValidate { log: String },

    #[error("failed to present frame: {0}")]
    Present(String),
}
