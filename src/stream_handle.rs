use std::io;

/// What sort of resource sits behind a handle.
///
/// Decided once when the handle is created, so asking for it never touches the
/// live stream (which may be closed by then).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Pipe,
    Terminal,
}

impl ResourceKind {
    pub fn is_seekable(self) -> bool {
        matches!(self, ResourceKind::File)
    }
}

/// The queries the seek operation needs from an open stream.
///
/// Implementors own the actual stream; the seek operation only borrows a handle
/// for the duration of one call and never synchronizes access to it.
pub trait StreamHandle {
    fn kind(&self) -> ResourceKind;

    fn is_closed(&mut self) -> bool;

    /// Total size in bytes, or `None` if it can't be determined.
    ///
    /// Zero and negative sizes are treated by callers the same as `None`.
    fn size(&mut self) -> Option<i64>;

    /// Absolute position of the cursor.
    fn offset(&mut self) -> io::Result<i64>;

    /// Move the cursor to the absolute position `target`.
    fn seek_to(&mut self, target: i64) -> io::Result<()>;

    fn is_seekable_kind(&self) -> bool {
        self.kind().is_seekable()
    }
}
