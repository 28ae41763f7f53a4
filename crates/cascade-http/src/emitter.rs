//! Response emitters.

use cascade_core::{CascadeError, CascadeResult, Emitter, Response};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Emits the response over any [`Write`] sink as a serialized HTTP/1.1
/// message: status line, headers, blank line, body.
///
/// Emission is once-only; a second call fails with
/// [`CascadeError::AlreadyEmitted`] without touching the sink.
pub struct WriterEmitter<W: Write + Send> {
    writer: Mutex<W>,
    emitted: AtomicBool,
}

impl<W: Write + Send> WriterEmitter<W> {
    /// Creates an emitter over the given sink.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            emitted: AtomicBool::new(false),
        }
    }

    /// Consumes the emitter and returns the sink.
    ///
    /// # Errors
    ///
    /// Fails with [`CascadeError::Internal`] when the sink's lock was
    /// poisoned by a panicking writer.
    pub fn into_inner(self) -> CascadeResult<W> {
        self.writer
            .into_inner()
            .map_err(|_| CascadeError::internal("emitter sink lock poisoned"))
    }
}

impl<W: Write + Send> Emitter for WriterEmitter<W> {
    fn emit(&self, response: &Response) -> CascadeResult<()> {
        if self.emitted.swap(true, Ordering::SeqCst) {
            return Err(CascadeError::AlreadyEmitted);
        }
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| CascadeError::internal("emitter sink lock poisoned"))?;

        let status = response.status();
        match status.canonical_reason() {
            Some(reason) => write!(writer, "{:?} {} {reason}\r\n", response.version(), status.as_u16())?,
            None => write!(writer, "{:?} {}\r\n", response.version(), status.as_u16())?,
        }
        for (name, value) in response.headers() {
            write!(writer, "{name}: ")?;
            writer.write_all(value.as_bytes())?;
            writer.write_all(b"\r\n")?;
        }
        writer.write_all(b"\r\n")?;
        writer.write_all(response.body())?;
        writer.flush()?;
        Ok(())
    }
}

/// An emitter that discards the response. The default for handlers whose
/// caller consumes the response directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEmitter;

impl Emitter for NullEmitter {
    fn emit(&self, _response: &Response) -> CascadeResult<()> {
        Ok(())
    }
}
