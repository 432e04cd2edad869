//! Value module - In-memory representation of key-value structures.
//!
//! This module provides the value model the merge, path and iteration
//! helpers operate on: scalars, lists, objects made of slots, and opaque
//! reference values.

mod object;
mod value;

pub use object::*;
pub use value::*;
