use crate::py_common::PySeekWhence;
use crate::py_err::py_err_to_io;
use crate::stream_handle::{ResourceKind, StreamHandle};
use pyo3::types::PyAny;
use pyo3::{PyObject, Python};
use std::io;

/// Python file-like object (= stream) seen through the `StreamHandle` interface.
pub struct PyFileStream {
    inner: PyObject,
    kind: ResourceKind,
}

/// Call a no-argument predicate method like `seekable()`.
///
/// A missing method, a raised exception or a non-bool result all count as
/// `false`.
fn predicate(stream: &PyAny, name: &str) -> bool {
    let answer = match stream.hasattr(name) {
        Ok(false) => return false,
        Ok(true) => stream
            .call_method0(name)
            .and_then(|result| result.extract::<bool>()),
        Err(e) => Err(e),
    };
    answer.unwrap_or_else(|e| {
        py_err_to_io(&format!("{}()", name), e);
        false
    })
}

/// Whether the stream's `closed` attribute says it's closed.
///
/// Objects without the attribute count as open. If it can't be read, the
/// stream counts as closed so nothing else gets called on it.
fn closed_flag(stream: &PyAny) -> bool {
    match stream.hasattr("closed") {
        Ok(false) => false,
        Ok(true) => stream
            .getattr("closed")
            .and_then(|closed| closed.extract::<bool>())
            .unwrap_or_else(|e| {
                py_err_to_io("closed", e);
                true
            }),
        Err(e) => {
            py_err_to_io("hasattr(closed)", e);
            true
        }
    }
}

impl PyFileStream {
    /// Wrap `inner`, deciding once what kind of resource it is.
    ///
    /// A stream that is already closed can't be asked (Python's `io` classes
    /// raise from `isatty()`/`seekable()` then), so it is taken to be a file
    /// and every seek on it reports the closed stream.
    pub fn new(py: Python<'_>, inner: PyObject) -> Self {
        let stream = inner.as_ref(py);
        let kind = if closed_flag(stream) {
            ResourceKind::File
        } else if predicate(stream, "isatty") {
            ResourceKind::Terminal
        } else if predicate(stream, "seekable") {
            ResourceKind::File
        } else {
            ResourceKind::Pipe
        };
        log::debug!("wrapped Python stream as {:?}", kind);
        PyFileStream { inner, kind }
    }

    pub fn inner(&self) -> &PyObject {
        &self.inner
    }

    fn tell(&self, py: Python<'_>) -> io::Result<i64> {
        self.inner
            .as_ref(py)
            .call_method0("tell")
            .and_then(|pos| pos.extract::<i64>())
            .map_err(|e| py_err_to_io("tell()", e))
    }

    fn raw_seek(&self, py: Python<'_>, offset: i64, whence: PySeekWhence) -> io::Result<i64> {
        self.inner
            .as_ref(py)
            .call_method1("seek", (offset, whence))
            .and_then(|pos| pos.extract::<i64>())
            .map_err(|e| py_err_to_io(&format!("seek({}, {:?})", offset, whence), e))
    }
}

impl StreamHandle for PyFileStream {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn is_closed(&mut self) -> bool {
        Python::with_gil(|py| closed_flag(self.inner.as_ref(py)))
    }

    fn size(&mut self) -> Option<i64> {
        Python::with_gil(|py| -> io::Result<i64> {
            let old_pos = self.tell(py)?;
            let len = self.raw_seek(py, 0, PySeekWhence::End)?;
            if len != old_pos {
                self.raw_seek(py, old_pos, PySeekWhence::Set)?;
            }
            Ok(len)
        })
        .ok()
    }

    fn offset(&mut self) -> io::Result<i64> {
        Python::with_gil(|py| self.tell(py))
    }

    /// Seek to `target`. If the stream lands anywhere else, the cursor is put
    /// back where it was and an error is returned.
    fn seek_to(&mut self, target: i64) -> io::Result<()> {
        Python::with_gil(|py| {
            let old_pos = self.tell(py)?;
            let reached = self.raw_seek(py, target, PySeekWhence::Set)?;
            if reached != target {
                self.raw_seek(py, old_pos, PySeekWhence::Set)?;
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Python stream ended up at {} instead of {}", reached, target),
                ));
            }
            Ok(())
        })
    }
}
