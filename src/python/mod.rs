//! Python bindings for the High Society environment.
//!
//! # Quick Start
//!
//! ```python
//! import high_society as hs
//!
//! env = hs.HighSocietyEnv(player_count=3, seed=42)
//! obs, info = env.reset(seed=42)
//!
//! while not all(env.terminations.values()):
//!     env.step(0.5)
//!
//! print(env.rewards)
//! ```

use pyo3::prelude::*;

mod py_env;

pub use py_env::*;

/// high_society: a multi-agent auction environment for RL training.
#[pymodule]
fn high_society(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyHighSocietyEnv>()?;
    Ok(())
}
