//! Filter specifications and their normalization into scope invocations.
//!
//! Callers describe the scopes they want in whichever shorthand is convenient; this module
//! turns that into a flat, ordered list of [`NormalizedFilter`]s ready to be applied.

pub mod normalizers;
pub mod spec;

pub use normalizers::*;
pub use spec::{FilterEntry, FilterSpec};
