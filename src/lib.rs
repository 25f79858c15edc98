//! Cursor positioning for open streams, in the style of xmake's `file:seek()`.
//!
//! The core (`seek::seek`) works on anything implementing `StreamHandle`. The
//! Python module wraps file-like objects so they can be used with it.
use pyo3::prelude::*;

pub mod anchor;
pub mod io_stream;
mod py_common;
mod py_err;
pub mod py_file_stream;
pub mod seek;
pub mod seekable_file;
pub mod stream_handle;

pub use crate::anchor::SeekAnchor;
pub use crate::io_stream::IoStream;
pub use crate::seek::{seek, OverflowPolicy, SeekError, SeekOptions, SeekRequest};
pub use crate::stream_handle::{ResourceKind, StreamHandle};

use crate::seekable_file::{seek_stream, SeekableFile};

#[pymodule]
fn stream_seek_rs(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<SeekableFile>()?;
    m.add_wrapped(wrap_pyfunction!(seek_stream))?;

    Ok(())
}
