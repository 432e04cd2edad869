//! Objects, slots and accessors.

use super::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Getter function of a computed slot.
pub type Getter = Arc<dyn Fn() -> Value + Send + Sync>;

/// Setter function of a computed slot.
pub type Setter = Arc<dyn Fn(Value) + Send + Sync>;

/// Attributes controls how a slot may be enumerated, redefined and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attributes {
    /// Visible to key iteration (`keys`, `entries`, serialization).
    pub enumerable: bool,
    /// The slot may be redefined, removed, or merged into.
    pub configurable: bool,
    /// Assignment may replace the value. Ignored for computed slots.
    pub writable: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        Attributes {
            enumerable: true,
            configurable: true,
            writable: true,
        }
    }
}

impl Attributes {
    /// Non-configurable but still writable.
    pub fn sealed() -> Self {
        Attributes {
            configurable: false,
            ..Attributes::default()
        }
    }

    /// Neither configurable nor writable.
    pub fn frozen() -> Self {
        Attributes {
            configurable: false,
            writable: false,
            ..Attributes::default()
        }
    }

    /// Configurable and writable but skipped by key iteration.
    pub fn hidden() -> Self {
        Attributes {
            enumerable: false,
            ..Attributes::default()
        }
    }
}

/// Accessor is a getter/setter pair standing in for a stored value.
///
/// The functions are shared: cloning an accessor, or mirroring it onto
/// another object, keeps pointing at the same getter and setter.
#[derive(Clone, Default)]
pub struct Accessor {
    get: Option<Getter>,
    set: Option<Setter>,
    pub attributes: Attributes,
}

impl Accessor {
    /// Creates an accessor with neither getter nor setter.
    pub fn new() -> Self {
        Accessor::default()
    }

    /// Sets the getter.
    pub fn getter(mut self, get: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.get = Some(Arc::new(get));
        self
    }

    /// Sets the setter.
    pub fn setter(mut self, set: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.set = Some(Arc::new(set));
        self
    }

    /// Sets the attributes.
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn has_getter(&self) -> bool {
        self.get.is_some()
    }

    pub fn has_setter(&self) -> bool {
        self.set.is_some()
    }

    /// Calls the getter. An accessor without a getter reads as `Null`.
    pub fn get(&self) -> Value {
        self.get.as_ref().map(|get| get()).unwrap_or_default()
    }

    /// Calls the setter. Returns false if there is none.
    pub fn set(&self, value: Value) -> bool {
        match &self.set {
            Some(set) => {
                set(value);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl PartialEq for Accessor {
    fn eq(&self, other: &Self) -> bool {
        fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        }

        self.attributes == other.attributes
            && same(&self.get, &other.get)
            && same(&self.set, &other.set)
    }
}

/// Slot is what an object stores under a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// A directly stored value.
    Plain { value: Value, attributes: Attributes },
    /// A getter/setter pair with no stored value.
    Computed(Accessor),
}

impl Slot {
    /// Creates a plain slot with default attributes.
    pub fn plain(value: impl Into<Value>) -> Self {
        Slot::Plain {
            value: value.into(),
            attributes: Attributes::default(),
        }
    }

    /// Creates a plain slot with the given attributes.
    pub fn with_attributes(value: impl Into<Value>, attributes: Attributes) -> Self {
        Slot::Plain {
            value: value.into(),
            attributes,
        }
    }

    pub fn attributes(&self) -> Attributes {
        match self {
            Slot::Plain { attributes, .. } => *attributes,
            Slot::Computed(accessor) => accessor.attributes,
        }
    }

    pub fn is_enumerable(&self) -> bool {
        self.attributes().enumerable
    }

    pub fn is_configurable(&self) -> bool {
        self.attributes().configurable
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Slot::Computed(_))
    }

    /// Reads the slot, calling the getter for computed slots.
    pub fn read(&self) -> Cow<'_, Value> {
        match self {
            Slot::Plain { value, .. } => Cow::Borrowed(value),
            Slot::Computed(accessor) => Cow::Owned(accessor.get()),
        }
    }

    pub fn as_plain(&self) -> Option<&Value> {
        match self {
            Slot::Plain { value, .. } => Some(value),
            Slot::Computed(_) => None,
        }
    }

    pub fn as_plain_mut(&mut self) -> Option<&mut Value> {
        match self {
            Slot::Plain { value, .. } => Some(value),
            Slot::Computed(_) => None,
        }
    }
}

/// Object maps string keys to slots.
///
/// Keys iterate in sorted order. An object may have a prototype whose keys
/// are inherited: readable through [`Object::get`] and visible to
/// [`Object::enumerate_chain`], but not own keys of this object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    slots: BTreeMap<String, Slot>,
    prototype: Option<Arc<Object>>,
}

impl Object {
    pub fn new() -> Self {
        Object::default()
    }

    /// Creates an empty object inheriting from `prototype`.
    pub fn with_prototype(prototype: Object) -> Self {
        Object {
            slots: BTreeMap::new(),
            prototype: Some(Arc::new(prototype)),
        }
    }

    pub fn prototype(&self) -> Option<&Object> {
        self.prototype.as_deref()
    }

    /// Number of own slots, enumerable or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, key: &str) -> Option<&Slot> {
        self.slots.get(key)
    }

    pub fn slot_mut(&mut self, key: &str) -> Option<&mut Slot> {
        self.slots.get_mut(key)
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Returns true if the key is own or inherited.
    pub fn has(&self, key: &str) -> bool {
        self.has_own(key) || self.prototype().is_some_and(|proto| proto.has(key))
    }

    /// Reads a key through the prototype chain.
    pub fn get(&self, key: &str) -> Option<Cow<'_, Value>> {
        match self.slots.get(key) {
            Some(slot) => Some(slot.read()),
            None => self.prototype().and_then(|proto| proto.get(key)),
        }
    }

    /// Returns the own plain value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.slots.get_mut(key).and_then(Slot::as_plain_mut)
    }

    /// Stores a plain value with default attributes, replacing whatever slot
    /// was there. Meant for building objects; it does not honor locks.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Slot> {
        self.slots.insert(key.into(), Slot::plain(value))
    }

    /// Assigns a value the way a property assignment does.
    ///
    /// Writable plain slots are overwritten, computed slots forward to their
    /// setter, and absent keys get a new plain slot. Returns false when the
    /// assignment was rejected (non-writable slot or missing setter).
    pub fn assign(&mut self, key: &str, value: Value) -> bool {
        match self.slots.get_mut(key) {
            Some(Slot::Plain {
                value: current,
                attributes,
            }) => {
                if !attributes.writable {
                    return false;
                }
                *current = value;
                true
            }
            Some(Slot::Computed(accessor)) => accessor.set(value),
            None => {
                self.slots.insert(key.to_string(), Slot::plain(value));
                true
            }
        }
    }

    /// Defines a slot. Fails if the existing slot is non-configurable.
    pub fn define(&mut self, key: impl Into<String>, slot: Slot) -> bool {
        let key = key.into();
        if self.slots.get(&key).is_some_and(|s| !s.is_configurable()) {
            return false;
        }
        self.slots.insert(key, slot);
        true
    }

    /// Removes a configurable own slot.
    pub fn remove(&mut self, key: &str) -> Option<Slot> {
        if self.slots.get(key)?.is_configurable() {
            self.slots.remove(key)
        } else {
            None
        }
    }

    /// Own enumerable keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.is_enumerable())
            .map(|(key, _)| key.as_str())
    }

    /// All own slots, including non-enumerable ones.
    pub fn slots(&self) -> impl Iterator<Item = (&String, &Slot)> {
        self.slots.iter()
    }

    /// Own enumerable keys with their values. Getters run lazily.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Cow<'_, Value>)> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.is_enumerable())
            .map(|(key, slot)| (key.as_str(), slot.read()))
    }

    /// Enumerable slots of this object followed by those of its prototype
    /// chain. A key seen closer to the object shadows the same key further
    /// up, even when the closer slot is not enumerable.
    pub fn enumerate_chain(&self) -> Vec<(&str, &Slot)> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let mut current = Some(self);
        while let Some(object) = current {
            for (key, slot) in &object.slots {
                if seen.insert(key.as_str()) && slot.is_enumerable() {
                    out.push((key.as_str(), slot));
                }
            }
            current = object.prototype();
        }
        out
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}
