//! Path module - Reaching into nested structures by an ordered list of keys.

mod access;
mod path;

pub use access::*;
pub use path::*;
