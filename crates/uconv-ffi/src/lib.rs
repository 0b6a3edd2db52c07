//! # Unit Conversion FFI
//!
//! Python 綁定層（PyO3）

use pyo3::prelude::*;

pub mod python;

/// Python 模組註冊
#[pymodule]
fn uconv_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyConversionEngine>()?;
    m.add_function(wrap_pyfunction!(python::init_logging, m)?)?;
    Ok(())
}
