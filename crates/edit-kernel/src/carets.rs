//! Carets and the offset-sorted caret set.
//!
//! A caret's identity ([`CaretId`]) is opaque: ids are compared for equality and hashed, never
//! ordered. Ordering inside a [`Carets`] set comes from offsets alone.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// Opaque caret identity.
///
/// Deliberately not `Ord`: positional order is a property of the caret, not of its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaretId(pub u64);

/// A cursor with an optional selection and a cached visual column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    /// Stable identity.
    pub id: CaretId,
    /// Cursor position (codepoints).
    pub offset: usize,
    /// Selection anchor (codepoints); equals `offset` when there is no selection.
    pub selection_start: usize,
    /// Selection end (codepoints); equals `offset` when there is no selection.
    pub selection_end: usize,
    /// Cached visual column used by vertical movement.
    pub v_col: usize,
}

impl Caret {
    /// Create a caret without a selection. `v_col` starts at 0.
    pub fn new(id: CaretId, offset: usize) -> Self {
        Self {
            id,
            offset,
            selection_start: offset,
            selection_end: offset,
            v_col: 0,
        }
    }

    /// Create a caret with explicit selection bounds.
    pub fn with_selection(
        id: CaretId,
        offset: usize,
        selection_start: usize,
        selection_end: usize,
    ) -> Self {
        Self {
            id,
            offset,
            selection_start,
            selection_end,
            v_col: 0,
        }
    }

    /// Set the cached visual column.
    pub fn with_v_col(mut self, v_col: usize) -> Self {
        self.v_col = v_col;
        self
    }

    /// Returns `true` if the selection bounds differ.
    pub fn has_selection(&self) -> bool {
        self.selection_start != self.selection_end
    }

    /// Returns `true` if there is no selection and both bounds sit at the offset.
    pub fn is_collapsed(&self) -> bool {
        self.offset == self.selection_start && self.offset == self.selection_end
    }

    /// Lower selection bound.
    pub fn selection_min(&self) -> usize {
        self.selection_start.min(self.selection_end)
    }

    /// Upper selection bound.
    pub fn selection_max(&self) -> usize {
        self.selection_start.max(self.selection_end)
    }

    /// Selected range as `selection_min()..selection_max()`.
    pub fn selection_range(&self) -> Range<usize> {
        self.selection_min()..self.selection_max()
    }

    /// Largest offset or bound this caret refers to.
    pub(crate) fn max_bound(&self) -> usize {
        self.offset.max(self.selection_max())
    }

    /// The same caret with its offset and selection bounds limited to `len`.
    pub(crate) fn clamped(self, len: usize) -> Caret {
        Caret {
            offset: self.offset.min(len),
            selection_start: self.selection_start.min(len),
            selection_end: self.selection_end.min(len),
            ..self
        }
    }
}

/// An offset-sorted set of carets with unique ids and strictly increasing offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carets {
    carets: Vec<Caret>,
    index: HashMap<CaretId, usize>,
}

impl Carets {
    /// Build a caret set from arbitrary carets.
    ///
    /// A later caret with an already-seen id replaces the earlier one; carets landing on the
    /// same offset collapse to the first of them.
    pub fn new<I>(carets: I) -> Self
    where
        I: IntoIterator<Item = Caret>,
    {
        Carets::default().merge(carets)
    }

    /// A caret set with a single caret.
    pub fn single(caret: Caret) -> Self {
        Self::new([caret])
    }

    /// Number of carets.
    pub fn len(&self) -> usize {
        self.carets.len()
    }

    /// Returns `true` if there are no carets.
    pub fn is_empty(&self) -> bool {
        self.carets.is_empty()
    }

    /// Look up a caret by id.
    pub fn get(&self, id: CaretId) -> Option<&Caret> {
        self.index.get(&id).map(|&idx| &self.carets[idx])
    }

    /// Returns `true` if a caret with this id exists.
    pub fn contains(&self, id: CaretId) -> bool {
        self.index.contains_key(&id)
    }

    /// Carets in ascending offset order.
    pub fn iter(&self) -> std::slice::Iter<'_, Caret> {
        self.carets.iter()
    }

    /// Carets in ascending offset order.
    pub fn as_slice(&self) -> &[Caret] {
        &self.carets
    }

    /// Replace or insert carets by id and re-sort by offset.
    ///
    /// Two distinct carets that end up on the same offset are collapsed into one: within a run
    /// of equal offsets the first caret taken from `updates` survives, or the first existing
    /// caret if none of the run was updated.
    pub fn merge<I>(&self, updates: I) -> Carets
    where
        I: IntoIterator<Item = Caret>,
    {
        let mut updated: Vec<Caret> = Vec::new();
        let mut updated_ids: HashSet<CaretId> = HashSet::new();
        for caret in updates {
            if updated_ids.insert(caret.id) {
                updated.push(caret);
            } else if let Some(slot) = updated.iter_mut().find(|c| c.id == caret.id) {
                *slot = caret;
            }
        }

        let mut combined: Vec<(Caret, bool)> = self
            .carets
            .iter()
            .filter(|c| !updated_ids.contains(&c.id))
            .map(|c| (*c, false))
            .chain(updated.into_iter().map(|c| (c, true)))
            .collect();
        // Stable: equal offsets keep existing-before-updated, then update order.
        combined.sort_by_key(|(caret, _)| caret.offset);

        let mut carets: Vec<Caret> = Vec::with_capacity(combined.len());
        let mut run_start = 0usize;
        while run_start < combined.len() {
            let offset = combined[run_start].0.offset;
            let run_end = combined[run_start..]
                .iter()
                .position(|(c, _)| c.offset != offset)
                .map_or(combined.len(), |len| run_start + len);
            let run = &combined[run_start..run_end];
            let keep = run
                .iter()
                .find(|(_, from_update)| *from_update)
                .unwrap_or(&run[0])
                .0;
            for (dropped, _) in run.iter().filter(|(c, _)| c.id != keep.id) {
                tracing::debug!(
                    kept = ?keep.id,
                    dropped = ?dropped.id,
                    offset,
                    "collapsing carets at the same offset"
                );
            }
            carets.push(keep);
            run_start = run_end;
        }

        Carets::from_sorted(carets)
    }

    fn from_sorted(carets: Vec<Caret>) -> Self {
        let index = carets
            .iter()
            .enumerate()
            .map(|(idx, caret)| (caret.id, idx))
            .collect();
        Self { carets, index }
    }
}

impl<'a> IntoIterator for &'a Carets {
    type Item = &'a Caret;
    type IntoIter = std::slice::Iter<'a, Caret>;

    fn into_iter(self) -> Self::IntoIter {
        self.carets.iter()
    }
}

impl FromIterator<Caret> for Carets {
    fn from_iter<I: IntoIterator<Item = Caret>>(iter: I) -> Self {
        Carets::new(iter)
    }
}
