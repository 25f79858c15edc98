use crate::py_file_stream::PyFileStream;
use crate::seek::{seek, OverflowPolicy, SeekError, SeekOptions, SeekRequest};
use crate::stream_handle::StreamHandle;
use pyo3::prelude::*;

/// Outcome of a seek as handed back to Python.
///
/// Success is the new offset as an `int`; failure is `(False, message)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekReply {
    Offset(i64),
    Failure(SeekError),
}

impl From<Result<i64, SeekError>> for SeekReply {
    fn from(result: Result<i64, SeekError>) -> SeekReply {
        match result {
            Ok(offset) => SeekReply::Offset(offset),
            Err(e) => SeekReply::Failure(e),
        }
    }
}

impl IntoPy<PyObject> for SeekReply {
    fn into_py(self, py: Python<'_>) -> PyObject {
        match self {
            SeekReply::Offset(offset) => offset.into_py(py),
            SeekReply::Failure(e) => (false, e.to_string()).into_py(py),
        }
    }
}

fn options_for(checked_overflow: bool) -> SeekOptions {
    SeekOptions {
        overflow: if checked_overflow {
            OverflowPolicy::Checked
        } else {
            OverflowPolicy::Compatible
        },
    }
}

/// A Python file-like object with xmake-style `seek(whence, offset)`.
///
/// Args:
///   stream: Python file-like object / stream. Its resource kind (file,
///     pipe, terminal) is determined when it is wrapped; a stream that is
///     already closed is treated as a file, so seeking it reports the closed
///     stream.
///   checked_overflow: Whether seeks relative to the current position should
///     fail with "invalid offset" when the target overflows, like seeks
///     relative to the end always do. By default the target wraps around and
///     the stream itself gets to reject it.
#[pyclass]
#[pyo3(text_signature = "(stream, *, checked_overflow=False)")]
pub struct SeekableFile {
    stream: PyFileStream,
    options: SeekOptions,
}

#[pymethods]
impl SeekableFile {
    #[new]
    #[pyo3(signature = (stream, *, checked_overflow = false))]
    fn new(stream: PyObject, checked_overflow: bool, py: Python<'_>) -> PyResult<Self> {
        Ok(SeekableFile {
            stream: PyFileStream::new(py, stream),
            options: options_for(checked_overflow),
        })
    }

    /// Move the stream's cursor and return the new absolute offset.
    ///
    /// `whence` is matched on its first letter only: "set"/"s..." counts from
    /// the start, "end"/"e..." from the end, anything else from the current
    /// position. On failure, `(False, message)` is returned instead of raising.
    #[pyo3(signature = (whence = "cur", offset = 0))]
    #[pyo3(text_signature = "($self, whence='cur', offset=0)")]
    fn seek(&mut self, whence: &str, offset: i64) -> SeekReply {
        seek(
            &mut self.stream,
            SeekRequest::from_whence(whence, offset),
            self.options,
        )
        .into()
    }

    /// The wrapped Python stream.
    #[getter]
    fn stream(&self, py: Python<'_>) -> PyObject {
        self.stream.inner().clone_ref(py)
    }

    #[getter]
    fn seekable(&self) -> bool {
        self.stream.is_seekable_kind()
    }

    #[getter]
    fn checked_overflow(&self) -> bool {
        self.options.overflow == OverflowPolicy::Checked
    }
}

/// One-off seek on a Python file-like object, same semantics as
/// `SeekableFile.seek`.
#[pyfunction]
#[pyo3(name = "seek", signature = (stream, whence = "cur", offset = 0, *, checked_overflow = false))]
#[pyo3(text_signature = "(stream, whence='cur', offset=0, *, checked_overflow=False)")]
pub fn seek_stream(
    py: Python<'_>,
    stream: PyObject,
    whence: &str,
    offset: i64,
    checked_overflow: bool,
) -> PyResult<SeekReply> {
    let mut stream = PyFileStream::new(py, stream);
    Ok(seek(
        &mut stream,
        SeekRequest::from_whence(whence, offset),
        options_for(checked_overflow),
    )
    .into())
}
