//! Sequence helpers used by the lane classifier.
//!
//! The classifier walks the same slope-sorted buffer from both ends. A
//! [`ReverseView`] gives the back-to-front traversal without copying, and the
//! [`Traversal`] trait lets one routine consume either direction.

use std::cmp::Ordering;
use std::iter::Rev;
use std::slice::Iter;

/// Read-only back-to-front view of a slice.
#[derive(Debug, Clone, Copy)]
pub struct ReverseView<'a, T> {
    items: &'a [T],
}

impl<'a, T> ReverseView<'a, T> {
    /// Wraps `items`; index 0 of the view is the last element of the slice.
    #[must_use]
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element `index` positions from the front of the view.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a T> {
        let last = self.items.len().checked_sub(1)?;
        self.items.get(last.checked_sub(index)?)
    }
}

/// Shorthand for [`ReverseView::new`].
#[must_use]
pub fn reversed<T>(items: &[T]) -> ReverseView<'_, T> {
    ReverseView::new(items)
}

/// An ordered, borrowed sequence that can be walked from its front.
pub trait Traversal<'a, T: 'a> {
    /// Iterator over the sequence in traversal order.
    type Iter: Iterator<Item = &'a T>;

    /// First element in traversal order.
    fn front(&self) -> Option<&'a T>;

    /// Last element in traversal order.
    fn back(&self) -> Option<&'a T>;

    /// Walks the sequence from front to back.
    fn traverse(&self) -> Self::Iter;
}

impl<'a, T: 'a> Traversal<'a, T> for &'a [T] {
    type Iter = Iter<'a, T>;

    fn front(&self) -> Option<&'a T> {
        let items: &'a [T] = *self;
        items.first()
    }

    fn back(&self) -> Option<&'a T> {
        let items: &'a [T] = *self;
        items.last()
    }

    fn traverse(&self) -> Self::Iter {
        let items: &'a [T] = *self;
        items.iter()
    }
}

impl<'a, T: 'a> Traversal<'a, T> for ReverseView<'a, T> {
    type Iter = Rev<Iter<'a, T>>;

    fn front(&self) -> Option<&'a T> {
        self.items.last()
    }

    fn back(&self) -> Option<&'a T> {
        self.items.first()
    }

    fn traverse(&self) -> Self::Iter {
        self.items.iter().rev()
    }
}

/// Index of the first element satisfying `predicate`.
pub fn find_index<'a, T: 'a, I, P>(items: I, mut predicate: P) -> Option<usize>
where
    I: IntoIterator<Item = &'a T>,
    P: FnMut(&T) -> bool,
{
    items.into_iter().position(|item| predicate(item))
}

/// Left fold starting from `seed`.
pub fn accumulate<'a, T: 'a, A, I, F>(items: I, seed: A, op: F) -> A
where
    I: IntoIterator<Item = &'a T>,
    F: FnMut(A, &'a T) -> A,
{
    items.into_iter().fold(seed, op)
}

/// Sorts in place by `compare`. Equal elements keep their relative order.
pub fn sort_by<T, F>(items: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(compare);
}

/// Maps every element into a new vector.
pub fn map_collect<'a, T: 'a, U, I, F>(items: I, f: F) -> Vec<U>
where
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&'a T) -> U,
{
    items.into_iter().map(f).collect()
}
