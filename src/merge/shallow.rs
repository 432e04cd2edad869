//! Single-level copying: shallow merge and clone.

use crate::value::{Object, Slot};
use tracing::trace;

/// Copies every own slot of each source onto `target`, later sources
/// winning. Plain values are assigned; computed slots are mirrored as the
/// same getter/setter pair. Nested structures are replaced, not merged.
pub fn shallow_merge<'t, 's, I>(target: &'t mut Object, sources: I) -> &'t mut Object
where
    I: IntoIterator<Item = &'s Object>,
{
    for source in sources {
        for (key, slot) in source.slots() {
            let stored = match slot {
                Slot::Plain { value, .. } => target.assign(key, value.clone()),
                Slot::Computed(_) => target.define(key.clone(), slot.clone()),
            };
            if !stored {
                trace!(key = %key, "slot not copied");
            }
        }
    }
    target
}

/// Returns a new object holding the own enumerable keys of `object`.
///
/// Values are read through their slots, so computed slots become plain
/// values in the copy. Nested structures are copied as values.
pub fn clone(object: &Object) -> Object {
    clone_filtered(object, |_| true)
}

/// Like [`clone`], keeping only keys for which `filter` returns true.
pub fn clone_filtered<F>(object: &Object, mut filter: F) -> Object
where
    F: FnMut(&str) -> bool,
{
    object
        .entries()
        .filter(|(key, _)| filter(*key))
        .map(|(key, value)| (key, value.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Accessor, Attributes, Value};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn obj(json: serde_json::Value) -> Object {
        Value::from(json).into_map().unwrap()
    }

    #[test]
    fn test_shallow_merge_later_sources_win() {
        let mut target = obj(json!({"a": 1}));
        shallow_merge(&mut target, [&obj(json!({"b": 2})), &obj(json!({"a": 3}))]);
        assert_eq!(target, obj(json!({"a": 3, "b": 2})));
    }

    #[test]
    fn test_shallow_merge_replaces_nested() {
        let mut target = obj(json!({"a": {"x": 1, "y": 2}}));
        shallow_merge(&mut target, [&obj(json!({"a": {"x": 9}}))]);
        assert_eq!(target, obj(json!({"a": {"x": 9}})));
    }

    #[test]
    fn test_shallow_merge_mirrors_accessors() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let accessor = Accessor::new().getter(move || {
            Value::Int(counter.fetch_add(1, Ordering::SeqCst) as i64)
        });
        let mut source = Object::new();
        source.define("n", Slot::Computed(accessor.clone()));

        let mut target = Object::new();
        shallow_merge(&mut target, [&source]);

        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert_eq!(target.slot("n"), Some(&Slot::Computed(accessor)));
        assert_eq!(target.get("n").as_deref(), Some(&Value::Int(0)));
        assert_eq!(target.get("n").as_deref(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_shallow_merge_keeps_frozen_slots() {
        let mut target = Object::new();
        target.define("a", Slot::with_attributes(1, Attributes::frozen()));
        shallow_merge(&mut target, [&obj(json!({"a": 2, "b": 3}))]);
        assert_eq!(target.get("a").as_deref(), Some(&Value::Int(1)));
        assert_eq!(target.get("b").as_deref(), Some(&Value::Int(3)));
    }

    #[test]
    fn test_clone_filtered() {
        let copy = clone_filtered(&obj(json!({"a": 1, "b": 2})), |k| k != "b");
        assert_eq!(copy, obj(json!({"a": 1})));
    }

    #[test]
    fn test_clone_is_one_level() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let accessor = Accessor::new().getter(move || {
            Value::Int(counter.fetch_add(1, Ordering::SeqCst) as i64)
        });
        let mut nested = Object::new();
        nested.define("live", Slot::Computed(accessor.clone()));
        let mut original = obj(json!({"a": 1}));
        original.insert("nested", nested);

        let copy = clone(&original);

        assert_eq!(reads.load(Ordering::SeqCst), 0);
        let copied = copy.get("nested").and_then(|v| v.as_map().cloned()).unwrap();
        assert_eq!(copied.slot("live"), Some(&Slot::Computed(accessor)));
        assert_eq!(copy.get("a").as_deref(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_clone_reads_getters_and_skips_hidden() {
        let mut original = Object::new();
        original.define("g", Slot::Computed(Accessor::new().getter(|| Value::from("v"))));
        original.define("h", Slot::with_attributes(1, Attributes::hidden()));

        let copy = clone(&original);
        assert_eq!(copy.slot("g"), Some(&Slot::plain("v")));
        assert!(!copy.has_own("h"));
    }
}
