//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`mirror`]: `fullsize` → `generated` tree mapping and derived file names
//! - [`target`]: files split into a base directory and a relative part

pub mod mirror;
pub mod target;

pub use mirror::Mirror;
pub use target::Target;
