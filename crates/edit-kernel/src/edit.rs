//! Edit scripts.
//!
//! An [`Edit`] is an ordered list of [`EditOp`]s applied left-to-right during a single linear
//! scan of the buffer:
//!
//! - **Retain(n)** - keep `n` codepoints unchanged
//! - **Insert(s)** - insert `s` at the scan position
//! - **Delete(s)** - remove the codepoints of `s`, which must match the buffer content
//!
//! Retain and Delete consume buffer codepoints, Insert consumes none. A script is *total* when
//! its consumed extent equals the buffer length; [`Edit::retain_to_end`] makes any prefix
//! script total by appending the missing Retain.

/// One element of an edit script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditOp {
    /// Skip `n` codepoints unchanged.
    Retain(usize),
    /// Insert literal text at the scan position.
    Insert(String),
    /// Remove the given text, which must be present at the scan position.
    Delete(String),
}

impl EditOp {
    /// Number of buffer codepoints this element consumes.
    pub fn source_len(&self) -> usize {
        match self {
            EditOp::Retain(count) => *count,
            EditOp::Delete(text) => text.chars().count(),
            EditOp::Insert(_) => 0,
        }
    }

    /// Number of codepoints this element contributes to the result.
    pub fn target_len(&self) -> usize {
        match self {
            EditOp::Retain(count) => *count,
            EditOp::Insert(text) => text.chars().count(),
            EditOp::Delete(_) => 0,
        }
    }
}

/// A complete edit script.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Edit {
    /// Script elements in application order.
    pub ops: Vec<EditOp>,
    /// Whether text inserted exactly at a caret lands before it.
    ///
    /// When `true`, carets sitting at an insertion point are pushed past the inserted text;
    /// when `false` they stay in front of it.
    pub insert_before_carets: bool,
}

impl Edit {
    /// Create a script from raw elements.
    pub fn new(ops: Vec<EditOp>, insert_before_carets: bool) -> Self {
        Self {
            ops,
            insert_before_carets,
        }
    }

    /// The empty script. It only applies to an empty text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The total script that leaves a text of `text_len` codepoints unchanged.
    ///
    /// Caret-only operations log this so that every logged script applies to its text.
    pub fn identity(text_len: usize) -> Self {
        Self::new(vec![EditOp::Retain(text_len)], false)
    }

    /// Build a total script from a prefix script by appending a trailing `Retain` that covers
    /// the rest of a buffer of `text_len` codepoints.
    ///
    /// The trailing Retain is always appended (possibly `Retain(0)`), so the shape of the output
    /// does not depend on where the last touched element ends.
    pub fn retain_to_end(mut ops: Vec<EditOp>, text_len: usize) -> Vec<EditOp> {
        let consumed = saturating_sum(ops.iter().map(EditOp::source_len));
        ops.push(EditOp::Retain(text_len.saturating_sub(consumed)));
        ops
    }

    /// Sum of Retain and Delete extents: the buffer length this script expects.
    ///
    /// Saturates at `usize::MAX`, which no text can match.
    pub fn source_len(&self) -> usize {
        saturating_sum(self.ops.iter().map(EditOp::source_len))
    }

    /// Sum of Retain and Insert extents: the buffer length after applying this script.
    ///
    /// Saturates at `usize::MAX`.
    pub fn target_len(&self) -> usize {
        saturating_sum(self.ops.iter().map(EditOp::target_len))
    }

    /// Returns `true` if applying this script leaves any buffer unchanged.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| match op {
            EditOp::Retain(_) => true,
            EditOp::Insert(text) | EditOp::Delete(text) => text.is_empty(),
        })
    }

    /// The script that undoes this one: inserts become deletes and vice versa.
    ///
    /// Applying `edit` and then `edit.inverse()` restores the original text exactly.
    pub fn inverse(&self) -> Edit {
        let ops = self
            .ops
            .iter()
            .map(|op| match op {
                EditOp::Retain(count) => EditOp::Retain(*count),
                EditOp::Insert(text) => EditOp::Delete(text.clone()),
                EditOp::Delete(text) => EditOp::Insert(text.clone()),
            })
            .collect();
        Edit::new(ops, self.insert_before_carets)
    }

    /// Map a pre-edit offset to the corresponding post-edit offset.
    ///
    /// Offsets inside a deleted range collapse to the deletion point. An offset at an insertion
    /// point, including the point left by a deletion, moves past the inserted text only if
    /// `stick_after_insert` is set. A replacement (Delete then Insert) therefore carries a caret
    /// from inside the replaced range to either end of the new text.
    pub fn map_offset(&self, offset: usize, stick_after_insert: bool) -> usize {
        let mut offset = offset;
        let mut old_pos = 0usize;
        let mut new_pos = 0usize;

        for op in &self.ops {
            match op {
                EditOp::Retain(count) => {
                    let end = old_pos.saturating_add(*count);
                    if offset < end {
                        return new_pos.saturating_add(offset - old_pos);
                    }
                    old_pos = end;
                    new_pos = new_pos.saturating_add(*count);
                }
                EditOp::Insert(text) => {
                    if offset == old_pos && !stick_after_insert {
                        return new_pos;
                    }
                    new_pos = new_pos.saturating_add(text.chars().count());
                }
                EditOp::Delete(text) => {
                    let end = old_pos.saturating_add(text.chars().count());
                    if offset < end {
                        // Collapsed onto the deletion point; following inserts still apply.
                        offset = end;
                    }
                    old_pos = end;
                }
            }
        }

        new_pos.saturating_add(offset.saturating_sub(old_pos))
    }
}

fn saturating_sum(lens: impl Iterator<Item = usize>) -> usize {
    lens.fold(0, usize::saturating_add)
}
