//! Response emission contract.

use crate::error::CascadeResult;
use crate::types::Response;

/// Writes the final response to the transport boundary.
///
/// An emitter must write the status line, headers, and body exactly once,
/// and must fail loudly with
/// [`CascadeError::AlreadyEmitted`](crate::CascadeError::AlreadyEmitted) if
/// output has already begun; a silent double emission would corrupt the
/// transport stream.
pub trait Emitter: Send + Sync {
    /// Emits the response.
    fn emit(&self, response: &Response) -> CascadeResult<()>;
}
