//! Tests for deep merge operations.

#[cfg(test)]
mod tests {
    use crate::merge::{deep_merge, deep_merge_with, Merger};
    use crate::value::{Accessor, Attributes, Object, Opaque, Slot, Value};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Helper to build an object from a JSON literal.
    fn obj(json: serde_json::Value) -> Object {
        Value::from(json).into_map().expect("object literal")
    }

    fn val(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_merge_into_empty_copies_everything() {
        let source = obj(json!({"a": 1, "b": {"c": [1, 2, {"d": true}]}}));
        let mut target = Object::new();
        deep_merge(&mut target, &source);
        assert_eq!(target, source);
    }

    #[test]
    fn test_merge_result_is_isolated_from_source() {
        let source = obj(json!({"nested": {"x": 1}}));
        let mut target = Object::new();
        deep_merge(&mut target, &source);

        target
            .get_mut("nested")
            .and_then(Value::as_map_mut)
            .unwrap()
            .insert("x", 2);

        assert_eq!(source, obj(json!({"nested": {"x": 1}})));
    }

    #[test]
    fn test_merge_recurses_into_nested_maps() {
        let mut target = obj(json!({"server": {"host": "localhost", "port": 80}, "debug": false}));
        let source = obj(json!({"server": {"port": 8080, "tls": {"enabled": true}}}));
        deep_merge(&mut target, &source);

        assert_eq!(
            target,
            obj(json!({
                "server": {"host": "localhost", "port": 8080, "tls": {"enabled": true}},
                "debug": false
            }))
        );
    }

    #[test]
    fn test_merge_returns_target_for_chaining() {
        let mut target = obj(json!({"a": 1}));
        deep_merge(&mut target, &obj(json!({"b": 2}))).insert("c", 3);
        assert_eq!(target, obj(json!({"a": 1, "b": 2, "c": 3})));
    }

    #[test]
    fn test_type_mismatch_replaces() {
        let mut target = obj(json!({"a": {"x": 1}, "b": 5, "c": [1], "d": null}));
        let source = obj(json!({"a": 7, "b": {"y": 2}, "c": {"z": 3}, "d": {"w": 4}}));
        deep_merge(&mut target, &source);
        assert_eq!(target, source);
    }

    #[test]
    fn test_null_source_replaces_map() {
        let mut target = obj(json!({"a": {"x": 1}}));
        deep_merge(&mut target, &obj(json!({"a": null})));
        assert_eq!(target, obj(json!({"a": null})));
    }

    #[test]
    fn test_lists_merge_by_index_and_take_source_length() {
        let mut target = obj(json!({"items": [{"a": 1, "b": 1}, 2, 3]}));
        let source = obj(json!({"items": [{"b": 2}, 9]}));
        deep_merge(&mut target, &source);
        assert_eq!(target, obj(json!({"items": [{"a": 1, "b": 2}, 9]})));

        let mut target = obj(json!({"items": [1]}));
        deep_merge(&mut target, &obj(json!({"items": [4, 5, 6]})));
        assert_eq!(target, obj(json!({"items": [4, 5, 6]})));
    }

    #[test]
    fn test_locked_slot_is_untouched() {
        let mut target = Object::new();
        target.define("k", Slot::with_attributes("v1", Attributes::frozen()));
        deep_merge(&mut target, &obj(json!({"k": "v2"})));
        assert_eq!(target.get("k").as_deref(), Some(&Value::from("v1")));
    }

    #[test]
    fn test_sealed_map_is_not_merged_into() {
        let mut target = Object::new();
        target.define("k", Slot::with_attributes(val(json!({"x": 1})), Attributes::sealed()));
        deep_merge(&mut target, &obj(json!({"k": {"y": 2}})));
        assert_eq!(target.get("k").as_deref(), Some(&val(json!({"x": 1}))));
    }

    #[test]
    fn test_locked_slot_beats_computed_source() {
        let mut target = Object::new();
        target.define("k", Slot::with_attributes(1, Attributes::frozen()));
        let mut source = Object::new();
        source.define("k", Slot::Computed(Accessor::new().getter(|| Value::Int(2))));

        deep_merge(&mut target, &source);
        assert!(!target.slot("k").unwrap().is_computed());
        assert_eq!(target.get("k").as_deref(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_opaque_target_is_replaced() {
        let mut target = Object::new();
        target.insert("k", Opaque::date(1_700_000_000_000));
        let source = obj(json!({"k": {"year": 2024}}));

        deep_merge(&mut target, &source);
        assert_eq!(target.get("k").as_deref(), source.get("k").as_deref());
    }

    #[test]
    fn test_opaque_source_replaces_map() {
        let mut target = obj(json!({"err": {"code": 1}}));
        let mut source = Object::new();
        source.insert("err", Opaque::error("TypeError", "boom"));

        deep_merge(&mut target, &source);
        assert_eq!(
            target.get("err").as_deref(),
            Some(&Value::from(Opaque::error("TypeError", "boom")))
        );
    }

    #[test]
    fn test_custom_opaque_policy() {
        let merger = Merger::builder()
            .opaque_policy(|v: &Value| v.as_map().is_some_and(|m| m.has_own("$atomic")))
            .build();

        let mut target = obj(json!({"a": {"$atomic": true, "x": 1}, "b": {"x": 1}}));
        let source = obj(json!({"a": {"y": 2}, "b": {"y": 2}}));
        merger.merge(&mut target, &source);

        assert_eq!(target, obj(json!({"a": {"y": 2}, "b": {"x": 1, "y": 2}})));
    }

    #[test]
    fn test_resolver_replaces_recursion() {
        let calls = Mutex::new(Vec::new());
        let mut target = obj(json!({"a": {"x": 1}}));
        deep_merge_with(&mut target, &obj(json!({"a": {"x": 2}})), |t, s| {
            calls.lock().unwrap().push((t.clone(), s.clone()));
        });

        assert_eq!(
            calls.into_inner().unwrap(),
            vec![(val(json!({"x": 1})), val(json!({"x": 2})))]
        );
        assert_eq!(target, obj(json!({"a": {"x": 1}})));
    }

    #[test]
    fn test_resolver_effect_is_the_outcome() {
        let mut target = obj(json!({"a": [1, 2], "b": {"n": 1}, "c": 1}));
        let source = obj(json!({"a": [3], "b": {"n": 2}, "c": 2}));
        deep_merge_with(&mut target, &source, |t, s| {
            if let (Value::List(t), Value::List(s)) = (t, s) {
                t.extend(s.iter().cloned());
            }
        });

        // "b" was handed to the resolver, which ignored it; "c" is a scalar.
        assert_eq!(target, obj(json!({"a": [1, 2, 3], "b": {"n": 1}, "c": 2})));
    }

    #[test]
    fn test_resolver_not_called_for_new_keys() {
        let mut calls = 0;
        let mut target = Object::new();
        deep_merge_with(&mut target, &obj(json!({"a": {"x": 1}})), |_, _| calls += 1);
        assert_eq!(calls, 0);
        assert_eq!(target, obj(json!({"a": {"x": 1}})));
    }

    #[test]
    fn test_computed_source_is_mirrored_not_read() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let accessor = Accessor::new()
            .getter(move || Value::Int(counter.fetch_add(1, Ordering::SeqCst) as i64))
            .attributes(Attributes::hidden());
        let mut source = Object::new();
        source.define("live", Slot::Computed(accessor.clone()));

        let mut target = obj(json!({"live": {"stale": true}}));
        deep_merge(&mut target, &source);

        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert_eq!(target.slot("live"), Some(&Slot::Computed(accessor)));
        assert!(!target.slot("live").unwrap().is_enumerable());
        assert_eq!(target.get("live").as_deref(), Some(&Value::Int(0)));
    }

    #[test]
    fn test_plain_source_goes_through_target_setter() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut target = Object::new();
        target.define(
            "k",
            Slot::Computed(Accessor::new().setter(move |v| sink.lock().unwrap().push(v))),
        );

        deep_merge(&mut target, &obj(json!({"k": {"x": 1}})));

        assert!(target.slot("k").unwrap().is_computed());
        assert_eq!(*seen.lock().unwrap(), vec![val(json!({"x": 1}))]);
    }

    #[test]
    fn test_hidden_source_slots_are_merged() {
        let mut source = Object::new();
        source.define("h", Slot::with_attributes(1, Attributes::hidden()));
        let mut target = Object::new();
        deep_merge(&mut target, &source);
        assert_eq!(target.get("h").as_deref(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_inherited_source_keys_are_ignored() {
        let proto = obj(json!({"inherited": 1}));
        let mut source = Object::with_prototype(proto);
        source.insert("own", 2);

        let mut target = Object::new();
        deep_merge(&mut target, &source);
        assert_eq!(target, obj(json!({"own": 2})));
    }

    fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            "[a-z]{0,6}".prop_map(Value::String),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        arb_leaf().prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|m| Value::Map(m.into_iter().collect())),
            ]
        })
    }

    fn arb_object() -> impl Strategy<Value = Object> {
        prop::collection::btree_map("[a-f]", arb_value(), 0..5)
            .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_merge_into_empty_is_identity(a in arb_object()) {
            let mut target = Object::new();
            deep_merge(&mut target, &a);
            prop_assert_eq!(target, a);
        }

        #[test]
        fn prop_merge_is_idempotent(a in arb_object()) {
            let mut once = Object::new();
            deep_merge(&mut once, &a);
            let mut twice = once.clone();
            deep_merge(&mut twice, &a);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn prop_disjoint_merge_is_union(a in arb_object(), b in arb_object()) {
            let b: Object = b
                .entries()
                .filter(|(k, _)| !a.has_own(k))
                .map(|(k, v)| (k, v.into_owned()))
                .collect();

            let mut merged = a.clone();
            deep_merge(&mut merged, &b);

            prop_assert_eq!(merged.len(), a.len() + b.len());
            for (k, v) in a.entries().chain(b.entries()) {
                let got = merged.get(k);
                prop_assert_eq!(got.as_deref(), Some(&*v));
            }
        }

        #[test]
        fn prop_source_is_never_mutated(a in arb_object(), b in arb_object()) {
            let before = b.clone();
            let mut target = a;
            deep_merge(&mut target, &b);
            prop_assert_eq!(b, before);
        }
    }
}
