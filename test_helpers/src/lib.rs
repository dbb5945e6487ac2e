//! Test helpers shared across crates.
//!
//! [`text`] compares generated code without caring about layout and
//! [`fs`] builds throwaway definition directories.

pub mod fs;
pub mod text;
