//! Insertion-ordered set over an arbitrary equality relation
//!
//! [Set] only requires its elements to implement [PartialEq]. Membership
//! is decided by a linear scan, so every operation is O(n) (or O(n·m)
//! for the binary operations). In exchange elements need neither [Hash]
//! nor [Ord] and the insertion order stays observable through
//! [Set::get] and [Set::iter].
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A duplicate-free collection that remembers insertion order
#[derive(Debug, Clone)]
pub struct Set<T> {
    elements: Vec<T>,
}

impl<T> Set<T> {
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Return the element at position `index` in insertion order, or
    /// `None` if the index is out of range
    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

impl<T: PartialEq> Set<T> {
    pub fn contains(&self, element: &T) -> bool {
        self.elements.iter().any(|e| e == element)
    }

    /// Add `element` unless an equal element is already present.
    ///
    /// Returns whether the set changed.
    pub fn insert(&mut self, element: T) -> bool {
        if self.contains(&element) {
            false
        } else {
            self.elements.push(element);
            true
        }
    }

    /// Remove the element equal to `element`, if any.
    ///
    /// Returns whether the set changed.
    pub fn remove(&mut self, element: &T) -> bool {
        let len = self.elements.len();
        self.elements.retain(|e| e != element);
        self.elements.len() != len
    }
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Set::new();
        set.extend(iter);
        set
    }
}

impl<T: PartialEq> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T: PartialEq, const N: usize> From<[T; N]> for Set<T> {
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// Two sets are equal if they have the same size and every element of
/// one is contained in the other. Order does not matter.
impl<T: PartialEq> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|e| other.contains(e))
    }
}

impl<T: fmt::Display> fmt::Display for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", element)?;
        }
        write!(f, "]")
    }
}

impl<T: Serialize> Serialize for Set<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.elements.iter())
    }
}

impl<'de, T: Deserialize<'de> + PartialEq> Deserialize<'de> for Set<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Set::from_iter)
    }
}

/// Return the elements of `s` that are also in `t`, in the order of `s`
pub fn intersect<T: PartialEq + Clone>(s: &Set<T>, t: &Set<T>) -> Set<T> {
    s.iter().filter(|e| t.contains(e)).cloned().collect()
}

/// Return the union of `s` and `t`: the elements of `s` followed by
/// the elements of `t` that are not in `s`
pub fn join<T: PartialEq + Clone>(s: &Set<T>, t: &Set<T>) -> Set<T> {
    let mut joined = s.clone();
    joined.extend(t.iter().cloned());
    joined
}
