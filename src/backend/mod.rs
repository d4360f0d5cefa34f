//! Uniform success/failure view over the two numeric back-ends.
//!
//! The engine never touches nalgebra or the DSP kernels directly; it drives
//! both through [`MatBackend`] and folds every non-success status into a
//! counted invalid trial.

pub mod compare;
pub mod dsp;
pub mod linalg;
pub mod traits;

pub use compare::{frobenius_error, is_finite};
pub use dsp::DspBackend;
pub use linalg::LinalgBackend;
pub use traits::{MatBackend, MatError, Operation};
