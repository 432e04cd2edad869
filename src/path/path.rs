//! Path type: an ordered list of keys.

use super::PathError;
use crate::value::Key;
use std::str::FromStr;

/// Path represents the keys leading to a nested value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    keys: Vec<Key>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path { keys: Vec::new() }
    }

    /// Creates a path from a vector of keys.
    pub fn from_keys(keys: Vec<Key>) -> Self {
        Path { keys }
    }

    /// Returns the number of keys in the path.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns an iterator over the keys.
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// Appends a key.
    pub fn push(&mut self, key: impl Into<Key>) {
        self.keys.push(key.into());
    }

    /// Removes and returns the last key.
    pub fn pop(&mut self) -> Option<Key> {
        self.keys.pop()
    }

    /// Returns the last key.
    pub fn last(&self) -> Option<&Key> {
        self.keys.last()
    }

    /// Creates a new path with the given key appended.
    pub fn with(&self, key: impl Into<Key>) -> Self {
        let mut new_path = self.clone();
        new_path.push(key);
        new_path
    }

    /// Returns a slice of the keys.
    pub fn as_slice(&self) -> &[Key] {
        &self.keys
    }
}

impl AsRef<[Key]> for Path {
    fn as_ref(&self) -> &[Key] {
        &self.keys
    }
}

impl From<&[Key]> for Path {
    fn from(keys: &[Key]) -> Self {
        Path {
            keys: keys.to_vec(),
        }
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        Path {
            keys: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = Key;
    type IntoIter = std::vec::IntoIter<Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for key in &self.keys {
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

/// Parses dotted notation: `a.b.c`, with `[n]` for list indices
/// (`servers[0].host`). Decimal segments such as `a.0` stay names; they
/// still index into lists.
impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = |reason| PathError::Parse {
            input: s.to_string(),
            reason,
        };

        let mut path = Path::new();
        if s.is_empty() {
            return Ok(path);
        }

        for segment in s.split('.') {
            let (name, mut rest) = match segment.find('[') {
                Some(i) => segment.split_at(i),
                None => (segment, ""),
            };
            if name.is_empty() && rest.is_empty() {
                return Err(parse_error("empty segment"));
            }
            if !name.is_empty() {
                path.push(name);
            }
            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| parse_error("unclosed '['"))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| parse_error("index is not a number"))?;
                path.push(index);
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(parse_error("unexpected text after ']'"));
                }
            }
        }
        Ok(path)
    }
}
