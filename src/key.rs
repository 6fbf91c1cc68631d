use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

use itertools::Itertools;
use strum::VariantArray;

/// The value a key holds along one dimension.
pub type Value = u8;

/// A coordinate axis usable in [`Key`]s.
///
/// Implementors are small fieldless enums listing every axis a puzzle's keys can mention,
/// deriving [`VariantArray`] and `Display` through strum.
/// [`SudokuDim`](crate::SudokuDim) is the built-in implementation.
pub trait Dim: Copy + Debug + Display + Eq + Hash + Ord + VariantArray + 'static {}

/// A set of `(dimension, value)` pairs naming one constraint or one choice.
///
/// A key holds at most one value per dimension; [`with`](Self::with) replaces the value if the
/// dimension is already set. A constraint is compatible with a choice exactly when the
/// constraint's key [`is_subset_of`](Self::is_subset_of) the choice's key.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Key<D: Dim> {
    // sorted by dimension, at most one entry each
    entries: Vec<(D, Value)>,
}

impl<D: Dim> Key<D> {
    /// An empty key, setting no dimensions.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// This key with `value` set along `dim`, replacing any value already there.
    pub fn with(mut self, dim: D, value: Value) -> Self {
        match self.entries.binary_search_by_key(&dim, |(d, _)| *d) {
            Ok(pos) => self.entries[pos].1 = value,
            Err(pos) => self.entries.insert(pos, (dim, value)),
        }
        self
    }

    /// The value along `dim`, if this key sets one.
    pub fn get(&self, dim: D) -> Option<Value> {
        self.entries
            .binary_search_by_key(&dim, |(d, _)| *d)
            .ok()
            .map(|pos| self.entries[pos].1)
    }

    /// The number of dimensions this key sets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this key sets no dimensions at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every `(dimension, value)` pair of `self` also appears in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.entries.iter().all(|entry| other.entries.binary_search(entry).is_ok())
    }

    /// Iterate over the `(dimension, value)` pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (D, Value)> + '_ {
        self.entries.iter().copied()
    }
}

impl<D: Dim> Default for Key<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dim> Display for Key<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.entries.iter().map(|(dim, value)| format!("{} {}", dim, value)).join(", "))
    }
}
