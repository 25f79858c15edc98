use pyo3::{IntoPy, PyObject, Python};

/// The `whence` values of Python's `IOBase.seek()` that are needed here.
///
/// Relative moves are always resolved to absolute ones first, so `SEEK_CUR`
/// (1) never has to be sent.
#[derive(Debug, Clone, Copy)]
pub enum PySeekWhence {
    Set = 0,
    End = 2,
}

impl IntoPy<PyObject> for PySeekWhence {
    fn into_py(self, py: Python<'_>) -> PyObject {
        (self as u32).into_py(py)
    }
}
