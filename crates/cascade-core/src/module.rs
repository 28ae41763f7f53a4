//! Application modules.

use crate::error::CascadeResult;
use crate::middleware::Handler;

/// A unit of application bootstrap.
///
/// Modules registered on a request handler are bootstrapped exactly once,
/// in registration order, the first time the handler dispatches. The
/// bootstrap hook receives the handler so a module can seed the pipeline
/// with its own middleware.
pub trait Module: Send + Sync {
    /// Returns the module name, used for diagnostics.
    fn name(&self) -> &'static str;

    /// Performs one-time setup.
    fn bootstrap(&self, handler: &mut dyn Handler) -> CascadeResult<()>;
}
