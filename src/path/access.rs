//! Reading and creating nested values by path.

use super::Path;
use crate::value::{Key, Object, Slot, Value};
use std::borrow::Cow;
use thiserror::Error;

/// PathError represents a failure to create or parse a path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("'{path}': cannot descend into {kind}")]
    NotAContainer { path: Path, kind: &'static str },

    #[error("'{path}': computed slot cannot be descended into")]
    ComputedSlot { path: Path },

    #[error("'{path}': slot is read-only")]
    ReadOnly { path: Path },

    #[error("'{path}': {name:?} is not a list index")]
    InvalidIndex { path: Path, name: String },

    #[error("'{path}': index {index} is past the end of a list of length {len}")]
    IndexOutOfRange { path: Path, index: usize, len: usize },

    #[error("invalid path {input:?}: {reason}")]
    Parse { input: String, reason: &'static str },
}

/// Walks `root` through `path` one key at a time.
///
/// Returns `None` as soon as a key is missing or an intermediate value has
/// no children. An empty path yields `root` itself. Inherited keys are
/// visible and getters run along the way.
pub fn get_path<'a>(root: &'a Value, path: impl AsRef<[Key]>) -> Option<Cow<'a, Value>> {
    let mut current = Cow::Borrowed(root);
    for key in path.as_ref() {
        current = match current {
            Cow::Borrowed(value) => value.child(key)?,
            Cow::Owned(value) => Cow::Owned(value.child(key)?.into_owned()),
        };
    }
    Some(current)
}

/// Stores `value` at `path` inside `root`, creating an empty map for every
/// missing or null intermediate key. Mutates `root` in place. An empty path
/// does nothing.
pub fn create_path(root: &mut Value, path: impl AsRef<[Key]>, value: Value) -> Result<(), PathError> {
    let keys = path.as_ref();
    let Some((last, parents)) = keys.split_last() else {
        return Ok(());
    };

    let mut current = root;
    for (depth, key) in parents.iter().enumerate() {
        current = descend(current, key, &keys[..depth])?;
    }
    store(current, last, value, &keys[..parents.len()])
}

/// Returns the child of `container` under `key`, creating it if needed.
/// `at` is the path of `container` itself.
fn descend<'v>(container: &'v mut Value, key: &Key, at: &[Key]) -> Result<&'v mut Value, PathError> {
    match container {
        Value::Map(object) => {
            let name = key.to_name();
            match object.slot(&name) {
                Some(Slot::Computed(_)) => {
                    return Err(PathError::ComputedSlot {
                        path: Path::from(at).with(key.clone()),
                    })
                }
                None | Some(Slot::Plain { value: Value::Null, .. }) => {
                    if !object.assign(&name, Value::Map(Object::new())) {
                        return Err(PathError::ReadOnly {
                            path: Path::from(at).with(key.clone()),
                        });
                    }
                }
                Some(Slot::Plain { .. }) => {}
            }
            object.get_mut(&name).ok_or_else(|| PathError::ComputedSlot {
                path: Path::from(at).with(key.clone()),
            })
        }
        Value::List(list) => {
            let child = list_slot(list, key, at)?;
            if child.is_null() {
                *child = Value::Map(Object::new());
            }
            Ok(child)
        }
        other => Err(PathError::NotAContainer {
            path: Path::from(at),
            kind: other.kind(),
        }),
    }
}

fn store(container: &mut Value, key: &Key, value: Value, at: &[Key]) -> Result<(), PathError> {
    match container {
        Value::Map(object) => {
            if object.assign(&key.to_name(), value) {
                Ok(())
            } else {
                Err(PathError::ReadOnly {
                    path: Path::from(at).with(key.clone()),
                })
            }
        }
        Value::List(list) => {
            *list_slot(list, key, at)? = value;
            Ok(())
        }
        other => Err(PathError::NotAContainer {
            path: Path::from(at),
            kind: other.kind(),
        }),
    }
}

/// Returns the element of `list` under `key`. An index one past the end
/// appends a `Null` element; anything further out is an error.
fn list_slot<'v>(list: &'v mut Vec<Value>, key: &Key, at: &[Key]) -> Result<&'v mut Value, PathError> {
    let index = key.as_index().ok_or_else(|| PathError::InvalidIndex {
        path: Path::from(at),
        name: key.to_name().into_owned(),
    })?;
    let len = list.len();
    if index == len {
        list.push(Value::Null);
    }
    list.get_mut(index).ok_or_else(|| PathError::IndexOutOfRange {
        path: Path::from(at).with(key.clone()),
        index,
        len,
    })
}
