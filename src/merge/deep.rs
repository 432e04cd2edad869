//! Deep merging of objects.

use crate::value::{Object, Slot, Value};
use tracing::trace;

/// OpaquePolicy decides which values a merge must replace rather than
/// descend into.
pub trait OpaquePolicy {
    /// Returns true if `value` is atomic for merging purposes.
    fn is_opaque(&self, value: &Value) -> bool;
}

/// ReferenceTypes treats dates, patterns and errors as opaque.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceTypes;

impl OpaquePolicy for ReferenceTypes {
    fn is_opaque(&self, value: &Value) -> bool {
        value.is_opaque()
    }
}

impl<F> OpaquePolicy for F
where
    F: Fn(&Value) -> bool,
{
    fn is_opaque(&self, value: &Value) -> bool {
        self(value)
    }
}

/// MergerBuilder is a builder for creating a Merger.
#[derive(Default)]
pub struct MergerBuilder {
    opaque: Option<Box<dyn OpaquePolicy + Send + Sync>>,
}

impl MergerBuilder {
    /// Creates a new MergerBuilder.
    pub fn new() -> Self {
        MergerBuilder::default()
    }

    /// Sets the policy that decides which values are replaced wholesale.
    pub fn opaque_policy(mut self, policy: impl OpaquePolicy + Send + Sync + 'static) -> Self {
        self.opaque = Some(Box::new(policy));
        self
    }

    /// Builds the Merger.
    pub fn build(self) -> Merger {
        Merger {
            opaque: self.opaque.unwrap_or_else(|| Box::new(ReferenceTypes)),
        }
    }
}

/// Merger deep-merges a source object into a target object in place.
///
/// For every own slot of the source, in order of precedence:
///
/// 1. a non-configurable target slot is left alone;
/// 2. a computed source slot is mirrored onto the target as the same
///    getter/setter pair, never read;
/// 3. when both slots are plain and hold maps (or both lists), and the target
///    value is not opaque, the values are merged recursively, or handed to the
///    resolver when one is given;
/// 4. otherwise the source value is assigned to the target key.
///
/// The source is never modified.
pub struct Merger {
    opaque: Box<dyn OpaquePolicy + Send + Sync>,
}

impl Default for Merger {
    fn default() -> Self {
        MergerBuilder::new().build()
    }
}

impl Merger {
    /// Creates a Merger with the default opaque policy.
    pub fn new() -> Self {
        Merger::default()
    }

    /// Creates a new MergerBuilder.
    pub fn builder() -> MergerBuilder {
        MergerBuilder::new()
    }

    /// Merges `source` into `target` and returns `target`.
    pub fn merge<'t>(&self, target: &'t mut Object, source: &Object) -> &'t mut Object {
        self.merge_object(target, source, None);
        target
    }

    /// Like [`Merger::merge`], but keys where both sides hold mergeable
    /// structures are passed to `resolve` instead of being merged. The
    /// resolver's effect on the target value is the entire outcome for that
    /// key. Nested levels are not resolved: the resolver only sees the
    /// top-level keys of `source`.
    pub fn merge_with<'t, F>(
        &self,
        target: &'t mut Object,
        source: &Object,
        mut resolve: F,
    ) -> &'t mut Object
    where
        F: FnMut(&mut Value, &Value),
    {
        let resolve: &mut dyn FnMut(&mut Value, &Value) = &mut resolve;
        self.merge_object(target, source, Some(resolve));
        target
    }

    fn merge_object(
        &self,
        target: &mut Object,
        source: &Object,
        mut resolve: Option<&mut dyn FnMut(&mut Value, &Value)>,
    ) {
        for (key, rslot) in source.slots() {
            if target.slot(key).is_some_and(|lslot| !lslot.is_configurable()) {
                trace!(key = %key, "skipping non-configurable slot");
                continue;
            }

            let rvalue = match rslot {
                Slot::Computed(accessor) => {
                    trace!(key = %key, "mirroring computed slot");
                    target.define(key.clone(), Slot::Computed(accessor.clone()));
                    continue;
                }
                Slot::Plain { value, .. } => value,
            };

            if let Some(lvalue) = target.slot_mut(key).and_then(Slot::as_plain_mut) {
                if self.is_mergeable(lvalue, rvalue) {
                    match resolve.as_deref_mut() {
                        Some(resolve) => {
                            trace!(key = %key, "resolving conflict");
                            resolve(lvalue, rvalue);
                        }
                        None => self.merge_value(lvalue, rvalue),
                    }
                    continue;
                }
            }

            if !target.assign(key, rvalue.clone()) {
                trace!(key = %key, "assignment rejected");
            }
        }
    }

    fn merge_value(&self, target: &mut Value, source: &Value) {
        match (target, source) {
            (Value::Map(t), Value::Map(s)) => self.merge_object(t, s, None),
            (Value::List(t), Value::List(s)) => self.merge_list(t, s),
            (t, s) => *t = s.clone(),
        }
    }

    /// Lists merge index by index and end up as long as the source.
    fn merge_list(&self, target: &mut Vec<Value>, source: &[Value]) {
        for (i, rvalue) in source.iter().enumerate() {
            match target.get_mut(i) {
                Some(lvalue) if self.is_mergeable(lvalue, rvalue) => self.merge_value(lvalue, rvalue),
                Some(lvalue) => *lvalue = rvalue.clone(),
                None => target.push(rvalue.clone()),
            }
        }
        target.truncate(source.len());
    }

    fn is_mergeable(&self, target: &Value, source: &Value) -> bool {
        let same_shape = matches!(
            (target, source),
            (Value::Map(_), Value::Map(_)) | (Value::List(_), Value::List(_))
        );
        same_shape && !self.opaque.is_opaque(target)
    }
}

/// Deep-merges `source` into `target` using the default opaque policy.
///
/// `target` is mutated in place and returned.
pub fn deep_merge<'t>(target: &'t mut Object, source: &Object) -> &'t mut Object {
    Merger::new().merge(target, source)
}

/// Deep-merges `source` into `target`, delegating conflicting structures to
/// `resolve`. See [`Merger::merge_with`].
pub fn deep_merge_with<'t, F>(target: &'t mut Object, source: &Object, resolve: F) -> &'t mut Object
where
    F: FnMut(&mut Value, &Value),
{
    Merger::new().merge_with(target, source, resolve)
}
