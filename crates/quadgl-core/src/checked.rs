//! Checked graphics calls.
//!
//! Every GL entry point the harness issues goes through [`Checked::call`],
//! which queries the sticky error flag exactly once after the operation. A
//! non-zero flag is fatal: the configured [`FatalHandler`] receives the
//! diagnostic and never returns.

use tracing::{error, trace, warn};

use crate::api::GraphicsApi;
use crate::error::{GlError, GlErrorCode, HarnessError};

/// Exit status used when a fatal graphics error terminates the process.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Receives a fatal diagnostic. Must not return.
pub type FatalHandler = fn(&HarnessError) -> !;

/// Query the error flag once and turn a non-zero code into a value.
pub fn check_error<G: GraphicsApi + ?Sized>(gl: &G, op: &'static str) -> Result<(), GlError> {
    match gl.get_error() {
        gl::NO_ERROR => Ok(()),
        code => Err(GlError {
            code: GlErrorCode::from_raw(code),
            op,
        }),
    }
}

/// Production fatal handler: log the diagnostic and exit immediately.
///
/// No destructors run; process teardown reclaims the GL context.
pub fn terminate(err: &HarnessError) -> ! {
    error!(%err, "fatal graphics error");
    eprintln!("Error: {err}");
    std::process::exit(FATAL_EXIT_CODE)
}

/// A graphics boundary paired with the fail-fast policy.
pub struct Checked<'g, G: ?Sized> {
    gl: &'g G,
    on_fatal: FatalHandler,
}

impl<G: ?Sized> Clone for Checked<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: ?Sized> Copy for Checked<'_, G> {}

impl<'g, G: GraphicsApi + ?Sized> Checked<'g, G> {
    /// Wrap `gl` with the process-terminating fatal handler.
    pub fn new(gl: &'g G) -> Self {
        Self::with_fatal_handler(gl, terminate)
    }

    pub fn with_fatal_handler(gl: &'g G, on_fatal: FatalHandler) -> Self {
        Self { gl, on_fatal }
    }

    /// Run `f`, then query the error flag once. Returns `f`'s result only
    /// when the flag was clear.
    pub fn call<T>(&self, op: &'static str, f: impl FnOnce(&'g G) -> T) -> T {
        let out = f(self.gl);
        if let Err(err) = check_error(self.gl, op) {
            self.fail(HarnessError::Graphics(err));
        }
        trace!(op, "ok");
        out
    }

    /// Run a release operation. Errors are logged and swallowed so that
    /// destructors never escalate.
    pub fn release(&self, op: &'static str, f: impl FnOnce(&'g G)) {
        f(self.gl);
        if let Err(err) = check_error(self.gl, op) {
            warn!(%err, "ignoring error while releasing GL object");
        }
    }

    /// Hand a fatal diagnostic to the handler.
    pub fn fail(&self, err: HarnessError) -> ! {
        (self.on_fatal)(&err)
    }
}
