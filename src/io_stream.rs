use crate::stream_handle::{ResourceKind, StreamHandle};
use std::io;
use std::io::{Seek, SeekFrom};

/// Adapter that makes any Rust `Seek` stream usable as a `StreamHandle`.
///
/// The stream is dropped by `close()`; after that the handle reports itself as
/// closed and every query fails.
pub struct IoStream<S: Seek> {
    inner: Option<S>,
    kind: ResourceKind,
}

impl<S: Seek> IoStream<S> {
    pub fn new(inner: S) -> Self {
        Self::with_kind(inner, ResourceKind::File)
    }

    pub fn with_kind(inner: S, kind: ResourceKind) -> Self {
        IoStream {
            inner: Some(inner),
            kind,
        }
    }

    pub fn close(&mut self) {
        self.inner = None;
    }

    pub fn get_mut(&mut self) -> Option<&mut S> {
        self.inner.as_mut()
    }

    fn open_inner(&mut self) -> io::Result<&mut S> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "stream is closed"))
    }
}

fn to_i64(pos: u64) -> io::Result<i64> {
    i64::try_from(pos).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("stream position {} doesn't fit into i64", pos),
        )
    })
}

/// Measure by going to the end, then put the cursor back.
fn measure_len<S: Seek>(inner: &mut S) -> io::Result<u64> {
    let old_pos = inner.stream_position()?;
    let len = inner.seek(SeekFrom::End(0))?;
    if old_pos != len {
        inner.seek(SeekFrom::Start(old_pos))?;
    }
    Ok(len)
}

impl<S: Seek> StreamHandle for IoStream<S> {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn is_closed(&mut self) -> bool {
        self.inner.is_none()
    }

    fn size(&mut self) -> Option<i64> {
        let inner = self.open_inner().ok()?;
        match measure_len(inner).and_then(to_i64) {
            Ok(len) => Some(len),
            Err(e) => {
                log::debug!("couldn't determine stream size: {}", e);
                None
            }
        }
    }

    fn offset(&mut self) -> io::Result<i64> {
        to_i64(self.open_inner()?.stream_position()?)
    }

    fn seek_to(&mut self, target: i64) -> io::Result<()> {
        let target = u64::try_from(target).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid seek to a negative position: {}", target),
            )
        })?;
        self.open_inner()?.seek(SeekFrom::Start(target))?;
        Ok(())
    }
}
