//! The middleware pipeline.

use cascade_core::{CascadeError, CascadeResult, MiddlewareSpec};

/// An ordered, mutable list of middleware descriptors with a dispatch
/// cursor.
///
/// The cursor starts at zero and only ever moves forward; it is advanced
/// by the dispatcher *before* the current middleware runs, so insertions
/// made mid-flight land relative to the next undispatched slot. Entries
/// at positions the cursor has already passed are never revisited.
#[derive(Debug, Default)]
pub struct Pipeline {
    entries: Vec<MiddlewareSpec>,
    cursor: usize,
    started: bool,
}

impl Pipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware descriptor to the end of the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidMiddleware`] when the descriptor is
    /// malformed, for example a named reference with an empty name.
    pub fn push(&mut self, spec: MiddlewareSpec) -> CascadeResult<()> {
        spec.validate()?;
        self.entries.push(spec);
        Ok(())
    }

    /// Inserts a middleware descriptor directly after the entry currently
    /// being dispatched.
    ///
    /// With the cursor already advanced past the running entry, "after the
    /// current one" is the cursor position plus one.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidPosition`] when that slot is out of
    /// bounds, or [`CascadeError::InvalidMiddleware`] when the descriptor
    /// is malformed.
    pub fn insert_next(&mut self, spec: MiddlewareSpec) -> CascadeResult<()> {
        self.insert_at(self.cursor + 1, vec![spec])
    }

    /// Splices a batch of middleware descriptors at the cursor, so they
    /// are dispatched next, in order, before any remaining entries.
    ///
    /// Every descriptor is validated before any of them is inserted; a
    /// malformed batch leaves the pipeline untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidPosition`] or
    /// [`CascadeError::InvalidMiddleware`] as [`Pipeline::insert_next`]
    /// does.
    pub fn splice(&mut self, batch: Vec<MiddlewareSpec>) -> CascadeResult<()> {
        self.insert_at(self.cursor, batch)
    }

    fn insert_at(&mut self, index: usize, batch: Vec<MiddlewareSpec>) -> CascadeResult<()> {
        if index > self.entries.len() {
            return Err(CascadeError::InvalidPosition {
                index,
                len: self.entries.len(),
            });
        }
        for spec in &batch {
            spec.validate()?;
        }
        self.entries.splice(index..index, batch);
        Ok(())
    }

    /// Returns the descriptor at the cursor, or `None` when the pipeline
    /// is exhausted.
    #[must_use]
    pub fn current(&self) -> Option<&MiddlewareSpec> {
        self.entries.get(self.cursor)
    }

    /// Moves the cursor one slot forward.
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of entries, dispatched ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the pipeline holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` once one-time dispatch setup has run.
    #[must_use]
    pub fn started(&self) -> bool {
        self.started
    }

    /// Records that one-time dispatch setup has run.
    pub fn mark_started(&mut self) {
        self.started = true;
    }

    /// Returns the labels of all entries, in order. Intended for logging
    /// and assertions.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(MiddlewareSpec::label).collect()
    }
}
