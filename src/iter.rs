//! Iteration helpers over maps and lists.
//!
//! `each` and `filter` only see own enumerable keys. `find` also walks the
//! prototype chain.

use crate::value::{Key, Object, Value};

/// Calls `f(value, key, container)` once per own enumerable key of a map,
/// or once per element of a list. Other values have no keys.
pub fn each<F>(container: &Value, mut f: F)
where
    F: FnMut(&Value, &Key, &Value),
{
    match container {
        Value::Map(object) => {
            for (name, value) in object.entries() {
                f(&*value, &Key::from(name), container);
            }
        }
        Value::List(list) => {
            for (i, value) in list.iter().enumerate() {
                f(value, &Key::Index(i), container);
            }
        }
        _ => {}
    }
}

/// Keeps the entries for which `pred(value, key, container)` holds.
///
/// A list yields a list of the passing elements in order; anything else
/// yields a map of the passing key/value pairs.
pub fn filter<F>(container: &Value, mut pred: F) -> Value
where
    F: FnMut(&Value, &Key, &Value) -> bool,
{
    match container {
        Value::List(list) => Value::List(
            list.iter()
                .enumerate()
                .filter(|(i, value)| pred(*value, &Key::Index(*i), container))
                .map(|(_, value)| value.clone())
                .collect(),
        ),
        _ => {
            let mut kept = Object::new();
            each(container, |value, key, container| {
                if pred(value, key, container) {
                    kept.insert(key.to_name(), value.clone());
                }
            });
            Value::Map(kept)
        }
    }
}

/// Returns the first value for which `pred(value, key)` holds.
///
/// Maps are searched in key order over own enumerable keys and then over
/// inherited ones; getters are only called up to the match.
pub fn find<F>(container: &Value, mut pred: F) -> Option<Value>
where
    F: FnMut(&Value, &Key) -> bool,
{
    match container {
        Value::Map(object) => object.enumerate_chain().into_iter().find_map(|(name, slot)| {
            let value = slot.read();
            pred(&*value, &Key::from(name)).then(|| value.into_owned())
        }),
        Value::List(list) => list
            .iter()
            .enumerate()
            .find(|(i, value)| pred(*value, &Key::Index(*i)))
            .map(|(_, value)| value.clone()),
        _ => None,
    }
}
