//! Sorted interval streams and their merge.
//!
//! Marker ranges (decorations, folds, highlights) come from several providers, each of which can
//! enumerate its intervals in `from` order. [`IntervalsIterator`] is the cursor over one such
//! stream and [`merge`] combines two streams into one ordered stream without collecting either.
//!
//! # Cursor protocol
//!
//! A cursor starts *before* its first element. [`IntervalsIterator::next`] advances and returns
//! whether an element is now readable; the accessors read that element:
//!
//! ```rust
//! use edit_kernel::intervals::{Interval, IntervalsIterator, forward_comparator, from_list, merge};
//!
//! let a = vec![Interval::new(1, 0, 3, "a")];
//! let b = vec![Interval::new(2, 1, 2, "b")];
//! let mut it = merge(from_list(&a), from_list(&b), forward_comparator);
//!
//! let mut seen = Vec::new();
//! while it.next() {
//!     seen.push((it.from(), it.to()));
//! }
//! assert_eq!(seen, vec![(0, 3), (1, 2)]);
//! ```

use std::cmp::Ordering;
use std::marker::PhantomData;

/// An interval with identity and payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    /// Identity, stable across re-iteration.
    pub id: u64,
    /// Start offset.
    pub from: usize,
    /// End offset.
    pub to: usize,
    /// Whether `from` itself belongs to the interval.
    pub closed_left: bool,
    /// Whether `to` itself belongs to the interval.
    pub closed_right: bool,
    /// Payload.
    pub data: T,
}

impl<T> Interval<T> {
    /// Create a half-open interval `[from, to)`.
    pub fn new(id: u64, from: usize, to: usize, data: T) -> Self {
        Self::with_bounds(id, from, to, true, false, data)
    }

    /// Create an interval with explicit boundary inclusivity.
    pub fn with_bounds(
        id: u64,
        from: usize,
        to: usize,
        closed_left: bool,
        closed_right: bool,
        data: T,
    ) -> Self {
        Self {
            id,
            from,
            to,
            closed_left,
            closed_right,
            data,
        }
    }

    /// Check whether `offset` lies inside the interval, honoring boundary inclusivity.
    pub fn contains(&self, offset: usize) -> bool {
        let after_start = if self.closed_left {
            self.from <= offset
        } else {
            self.from < offset
        };
        let before_end = if self.closed_right {
            offset <= self.to
        } else {
            offset < self.to
        };
        after_start && before_end
    }
}

/// A single-pass cursor over a sorted interval stream.
///
/// Accessors read the element the last successful [`IntervalsIterator::next`] positioned on.
/// Reading before the first `next()` or after `next()` returned `false` is a contract
/// violation; the implementations in this module panic in that case.
pub trait IntervalsIterator<T> {
    /// Whether the current interval includes its start.
    fn closed_left(&self) -> bool;
    /// Whether the current interval includes its end.
    fn closed_right(&self) -> bool;
    /// Start of the current interval.
    fn from(&self) -> usize;
    /// End of the current interval.
    fn to(&self) -> usize;
    /// Identity of the current interval.
    fn id(&self) -> u64;
    /// Payload of the current interval.
    fn data(&self) -> &T;
    /// Advance to the next interval; returns `false` once the stream is exhausted.
    fn next(&mut self) -> bool;

    /// Copy the current element out of the cursor.
    fn interval(&self) -> Interval<T>
    where
        T: Clone,
    {
        Interval::with_bounds(
            self.id(),
            self.from(),
            self.to(),
            self.closed_left(),
            self.closed_right(),
            self.data().clone(),
        )
    }
}

/// Ascending `from` order.
pub fn forward_comparator<T>(a: &dyn IntervalsIterator<T>, b: &dyn IntervalsIterator<T>) -> Ordering {
    a.from().cmp(&b.from())
}

/// Descending `from` order; the exact reverse of [`forward_comparator`].
pub fn backward_comparator<T>(a: &dyn IntervalsIterator<T>, b: &dyn IntervalsIterator<T>) -> Ordering {
    forward_comparator(a, b).reverse()
}

/// Cursor over an already-sorted slice. No sorting is performed.
#[derive(Debug, Clone)]
pub struct ListIterator<'a, T> {
    intervals: &'a [Interval<T>],
    // Number of successful `next()` calls; the current element is `advanced - 1`.
    advanced: usize,
}

/// Wrap a slice, sorted in the order its consumer expects, as a cursor.
pub fn from_list<T>(intervals: &[Interval<T>]) -> ListIterator<'_, T> {
    ListIterator {
        intervals,
        advanced: 0,
    }
}

impl<'a, T> ListIterator<'a, T> {
    fn current(&self) -> &'a Interval<T> {
        match self.advanced.checked_sub(1).and_then(|idx| self.intervals.get(idx)) {
            Some(interval) => interval,
            None => panic!("intervals iterator read while not positioned on an element"),
        }
    }
}

impl<T> IntervalsIterator<T> for ListIterator<'_, T> {
    fn closed_left(&self) -> bool {
        self.current().closed_left
    }

    fn closed_right(&self) -> bool {
        self.current().closed_right
    }

    fn from(&self) -> usize {
        self.current().from
    }

    fn to(&self) -> usize {
        self.current().to
    }

    fn id(&self) -> u64 {
        self.current().id
    }

    fn data(&self) -> &T {
        &self.current().data
    }

    fn next(&mut self) -> bool {
        if self.advanced < self.intervals.len() {
            self.advanced += 1;
            true
        } else {
            // Park past the end so reads keep failing after exhaustion.
            self.advanced = self.intervals.len() + 1;
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    First,
    Second,
}

/// The ordered union of two sorted cursors. See [`merge`].
pub struct MergingIterator<T, A, B, C> {
    first: A,
    second: B,
    comparator: C,
    first_live: bool,
    second_live: bool,
    started: bool,
    current: Option<Side>,
    _data: PhantomData<fn() -> T>,
}

/// Merge two cursors sorted by `comparator` into one.
///
/// At each step the heads of both streams are compared and the smaller one is yielded; on a tie
/// the element of `first` comes first. Only the consumed stream is advanced. Both cursors are
/// owned by the merged cursor from here on.
pub fn merge<T, A, B, C>(first: A, second: B, comparator: C) -> MergingIterator<T, A, B, C>
where
    A: IntervalsIterator<T>,
    B: IntervalsIterator<T>,
    C: Fn(&dyn IntervalsIterator<T>, &dyn IntervalsIterator<T>) -> Ordering,
{
    MergingIterator {
        first,
        second,
        comparator,
        first_live: false,
        second_live: false,
        started: false,
        current: None,
        _data: PhantomData,
    }
}

impl<T, A, B, C> MergingIterator<T, A, B, C>
where
    A: IntervalsIterator<T>,
    B: IntervalsIterator<T>,
    C: Fn(&dyn IntervalsIterator<T>, &dyn IntervalsIterator<T>) -> Ordering,
{
    fn active(&self) -> &dyn IntervalsIterator<T> {
        match self.current {
            Some(Side::First) => &self.first,
            Some(Side::Second) => &self.second,
            None => panic!("merged intervals iterator read while not positioned on an element"),
        }
    }
}

impl<T, A, B, C> IntervalsIterator<T> for MergingIterator<T, A, B, C>
where
    A: IntervalsIterator<T>,
    B: IntervalsIterator<T>,
    C: Fn(&dyn IntervalsIterator<T>, &dyn IntervalsIterator<T>) -> Ordering,
{
    fn closed_left(&self) -> bool {
        self.active().closed_left()
    }

    fn closed_right(&self) -> bool {
        self.active().closed_right()
    }

    fn from(&self) -> usize {
        self.active().from()
    }

    fn to(&self) -> usize {
        self.active().to()
    }

    fn id(&self) -> u64 {
        self.active().id()
    }

    fn data(&self) -> &T {
        self.active().data()
    }

    fn next(&mut self) -> bool {
        match self.current {
            Some(Side::First) => self.first_live = self.first.next(),
            Some(Side::Second) => self.second_live = self.second.next(),
            None if !self.started => {
                self.started = true;
                self.first_live = self.first.next();
                self.second_live = self.second.next();
            }
            None => return false,
        }

        self.current = match (self.first_live, self.second_live) {
            (true, true) => match (self.comparator)(&self.first, &self.second) {
                Ordering::Greater => Some(Side::Second),
                Ordering::Less | Ordering::Equal => Some(Side::First),
            },
            (true, false) => Some(Side::First),
            (false, true) => Some(Side::Second),
            (false, false) => None,
        };
        self.current.is_some()
    }
}

/// Adapter exposing a cursor as a standard [`Iterator`] of owned intervals.
pub struct Intervals<T, I> {
    cursor: I,
    _data: PhantomData<fn() -> T>,
}

impl<T, I> Intervals<T, I>
where
    I: IntervalsIterator<T>,
{
    /// Wrap a cursor that has not been advanced yet.
    pub fn new(cursor: I) -> Self {
        Self {
            cursor,
            _data: PhantomData,
        }
    }
}

impl<T, I> Iterator for Intervals<T, I>
where
    T: Clone,
    I: IntervalsIterator<T>,
{
    type Item = Interval<T>;

    fn next(&mut self) -> Option<Interval<T>> {
        if self.cursor.next() {
            Some(self.cursor.interval())
        } else {
            None
        }
    }
}
