//! # objs
//!
//! Object algebra for in-memory key-value structures.
//!
//! Objects are maps from string keys to [`Slot`]s: either a plain stored
//! value or a computed getter/setter pair. On top of that model this crate
//! provides deep and shallow merging, cloning, nested path access and a few
//! iteration helpers, the building blocks of configuration composition.
//!
//! Merging and path creation mutate their first argument in place; callers
//! keep ownership of every structure.
//!
//! ## Modules
//!
//! - [`value`] - The value model: [`Value`], [`Object`], [`Slot`], [`Opaque`]
//! - [`merge`] - Deep merge with conflict resolution, shallow merge and clone
//! - [`path`] - Reading and creating values at nested paths
//! - [`iter`] - `each`, `filter` and `find` over maps and lists
//!
//! ```
//! use objs::{deep_merge, Object, Value};
//!
//! let mut defaults: Object = serde_json::from_str(r#"{"server": {"port": 80, "host": "::"}}"#).unwrap();
//! let overrides: Object = serde_json::from_str(r#"{"server": {"port": 8080}}"#).unwrap();
//!
//! deep_merge(&mut defaults, &overrides);
//! assert_eq!(
//!     objs::get_path(&Value::Map(defaults), ["server", "port"].map(objs::Key::from)).as_deref(),
//!     Some(&Value::Int(8080))
//! );
//! ```

pub mod iter;
pub mod merge;
pub mod path;
pub mod value;

pub use iter::{each, filter, find};
pub use merge::{
    clone, clone_filtered, deep_merge, deep_merge_with, mixin, shallow_merge, Merger,
    MergerBuilder, OpaquePolicy, ReferenceTypes,
};
pub use path::{create_path, get_path, Path, PathError};
pub use value::{Accessor, Attributes, FormatError, Key, Object, Opaque, Slot, Value};
