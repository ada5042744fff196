/// The base trait for any value that can live in a variable's domain.
///
/// A value must be cloneable, debuggable, equatable and hashable. This is a
/// marker trait, so any type satisfying those bounds implements it.
pub trait ValueEquality: Clone + std::fmt::Debug + Eq + std::hash::Hash + 'static {}
impl<T> ValueEquality for T where T: Clone + std::fmt::Debug + Eq + std::hash::Hash + 'static {}

/// A capability trait for values with a defined ordering, used by ordered
/// domain representations and bounds-based pruning.
pub trait ValueOrdering: ValueEquality + Ord {}
impl<T> ValueOrdering for T where T: ValueEquality + Ord {}

/// A capability trait for values that support integer-style arithmetic.
///
/// Constraints such as the linear-modulo constraint are generic over the
/// value type and rely on these operations.
pub trait ValueArithmetic: ValueEquality {
    /// Adds two values.
    ///
    /// # Panics
    ///
    /// May panic if the underlying type does not support addition (e.g.
    /// booleans).
    fn add(&self, other: &Self) -> Self;
    /// Subtracts one value from another.
    ///
    /// # Panics
    ///
    /// May panic if the underlying type does not support subtraction.
    fn sub(&self, other: &Self) -> Self;
    /// Multiplies two values.
    ///
    /// # Panics
    ///
    /// May panic if the underlying type does not support multiplication.
    fn mul(&self, other: &Self) -> Self;
    /// The least non-negative residue of `self` modulo `other`.
    ///
    /// # Panics
    ///
    /// May panic if the underlying type does not support the operation, or
    /// if `other` is zero.
    fn rem_euclid(&self, other: &Self) -> Self;
}

/// A capability trait for values that can serve as an index into an array of
/// variables, as required by the element constraint.
pub trait ValueIndexing: ValueEquality {
    /// Interprets the value as a zero-based index. `None` if the value is
    /// not a non-negative integer.
    fn as_index(&self) -> Option<usize>;
}

/// A concrete enum providing standard, reusable value capabilities.
///
/// Problem frontends can use `StandardValue` directly, or wrap it in their
/// own value enum, to gain support for the stock constraints without
/// reimplementing the arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardValue {
    /// A 64-bit integer value.
    Int(i64),
    /// A boolean value.
    Bool(bool),
}

impl From<i64> for StandardValue {
    fn from(i: i64) -> Self {
        StandardValue::Int(i)
    }
}

impl ValueArithmetic for StandardValue {
    fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (StandardValue::Int(a), StandardValue::Int(b)) => StandardValue::Int(a + b),
            _ => panic!("Arithmetic add is only supported for Int types"),
        }
    }

    fn sub(&self, other: &Self) -> Self {
        match (self, other) {
            (StandardValue::Int(a), StandardValue::Int(b)) => StandardValue::Int(a - b),
            _ => panic!("Arithmetic sub is only supported for Int types"),
        }
    }

    fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (StandardValue::Int(a), StandardValue::Int(b)) => StandardValue::Int(a * b),
            _ => panic!("Arithmetic mul is only supported for Int types"),
        }
    }

    fn rem_euclid(&self, other: &Self) -> Self {
        match (self, other) {
            (StandardValue::Int(a), StandardValue::Int(b)) => StandardValue::Int(a.rem_euclid(*b)),
            _ => panic!("Arithmetic rem_euclid is only supported for Int types"),
        }
    }
}

impl ValueIndexing for StandardValue {
    fn as_index(&self) -> Option<usize> {
        match self {
            StandardValue::Int(i) if *i >= 0 => Some(*i as usize),
            _ => None,
        }
    }
}
