//! Merge module - Deep and shallow merging of objects.
//!
//! Both merges mutate their target in place and hand it back for chaining.

mod deep;
mod shallow;

#[cfg(test)]
mod merge_test;

pub use deep::*;
pub use shallow::*;

/// Alias of [`shallow_merge`].
pub use shallow::shallow_merge as mixin;
