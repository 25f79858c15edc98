use pyo3::{prelude::PyErr, Python};
/// Turning Python exceptions into Rust I/O errors.
use std::io;

fn format_traceback(py_err: &PyErr) -> String {
    Python::with_gil(|py| {
        py_err
            .traceback(py)
            .map_or(Ok("(no traceback available)".to_string()), |tb| tb.format())
    })
    .unwrap_or("(error getting traceback)".to_string())
}

/// Wrap a Python exception raised by the stream's `what` call in an `io::Error`.
///
/// Logs it too, since callers usually collapse the error into a plain failure.
pub fn py_err_to_io(what: &str, e: PyErr) -> io::Error {
    let message = format!(
        "Error calling {} on Python stream: {}\n{}",
        what,
        e,
        format_traceback(&e),
    );
    log::warn!("{}", message);
    io::Error::new(io::ErrorKind::Other, message)
}
