//! Relative caret movements.
//!
//! A [`CaretMovement`] is a pure delta computed from a caret's current state. Deltas are relative
//! so a batch of them can be applied against a text whose length bounds the result; applying one
//! clamps into `[0, text_len]` instead of failing.

use crate::carets::Caret;
use crate::error::{EditError, Result};
use crate::text::Text;

/// Offset and selection deltas for one caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaretMovement {
    /// Change of the caret offset.
    pub offset_delta: isize,
    /// Change of the selection start.
    pub selection_start_delta: isize,
    /// Change of the selection end.
    pub selection_end_delta: isize,
    /// Keep the caret's visual column instead of recomputing it from the new offset.
    pub keep_v_col: bool,
}

fn delta(to: usize, from: usize) -> isize {
    (to as isize).wrapping_sub(from as isize)
}

impl CaretMovement {
    /// Create a movement from raw deltas.
    pub fn new(
        offset_delta: isize,
        selection_start_delta: isize,
        selection_end_delta: isize,
        keep_v_col: bool,
    ) -> Self {
        Self {
            offset_delta,
            selection_start_delta,
            selection_end_delta,
            keep_v_col,
        }
    }

    /// Movement that takes `caret` to `target_offset`.
    ///
    /// With `extend_selection`, the anchor that is not at the caret offset is kept and the
    /// selection grows or shrinks to reach the target. Without it the caret must be collapsed;
    /// a selected caret has to drop its selection first.
    pub fn move_to(
        caret: &Caret,
        target_offset: usize,
        extend_selection: bool,
        keep_v_col: bool,
    ) -> Result<Self> {
        if !extend_selection {
            if !caret.is_collapsed() {
                return Err(EditError::SelectionNotCollapsed { id: caret.id });
            }
            let d = delta(target_offset, caret.offset);
            return Ok(Self::new(d, d, d, keep_v_col));
        }

        let anchor = if caret.selection_start == caret.offset {
            caret.selection_end
        } else if caret.selection_end == caret.offset {
            caret.selection_start
        } else {
            caret.offset
        };
        let selection_start = anchor.min(target_offset);
        let selection_end = anchor.max(target_offset);

        Ok(Self::new(
            delta(target_offset, caret.offset),
            delta(selection_start, caret.selection_start),
            delta(selection_end, caret.selection_end),
            keep_v_col,
        ))
    }

    /// Movement that sets the selection to `start..end` without moving the offset.
    pub fn expand_selection(caret: &Caret, start: usize, end: usize) -> Self {
        Self::new(
            0,
            delta(start, caret.selection_start),
            delta(end, caret.selection_end),
            true,
        )
    }

    /// Apply this movement to `caret`, clamping into the bounds of `text`.
    pub fn apply(&self, caret: &Caret, text: &Text) -> Caret {
        let len = text.code_points_count();
        let offset = restrict_to_length(caret.offset, self.offset_delta, len);
        let v_col = if self.keep_v_col {
            caret.v_col
        } else {
            text.offset_to_geom_col(offset)
        };
        Caret {
            id: caret.id,
            offset,
            selection_start: restrict_to_length(caret.selection_start, self.selection_start_delta, len),
            selection_end: restrict_to_length(caret.selection_end, self.selection_end_delta, len),
            v_col,
        }
    }
}

fn restrict_to_length(value: usize, delta: isize, len: usize) -> usize {
    value.saturating_add_signed(delta).min(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carets::CaretId;

    #[test]
    fn test_extending_move_from_collapsed_caret() {
        let caret = Caret::new(CaretId(1), 3);
        let movement = CaretMovement::move_to(&caret, 7, true, false).unwrap();
        assert_eq!(movement, CaretMovement::new(4, 0, 4, false));
    }

    #[test]
    fn test_extending_move_keeps_start_anchor() {
        // Selection 2..6 with the caret at the end; moving to 1 flips it to 1..2.
        let caret = Caret::with_selection(CaretId(1), 6, 2, 6);
        let movement = CaretMovement::move_to(&caret, 1, true, true).unwrap();
        assert_eq!(movement, CaretMovement::new(-5, -1, -4, true));
    }

    #[test]
    fn test_extending_move_keeps_end_anchor() {
        // Caret at the selection start; the end (6) is the anchor.
        let caret = Caret::with_selection(CaretId(1), 2, 2, 6);
        let movement = CaretMovement::move_to(&caret, 4, true, false).unwrap();
        assert_eq!(movement, CaretMovement::new(2, 2, 0, false));
    }

    #[test]
    fn test_extending_move_from_interior_caret() {
        let caret = Caret::with_selection(CaretId(1), 4, 2, 6);
        let movement = CaretMovement::move_to(&caret, 8, true, false).unwrap();
        // New selection 4..8.
        assert_eq!(movement, CaretMovement::new(4, 2, 2, false));
    }

    #[test]
    fn test_collapse_move_requires_no_selection() {
        let caret = Caret::new(CaretId(1), 5);
        assert_eq!(
            CaretMovement::move_to(&caret, 2, false, false).unwrap(),
            CaretMovement::new(-3, -3, -3, false)
        );

        let selected = Caret::with_selection(CaretId(2), 5, 1, 5);
        assert_eq!(
            CaretMovement::move_to(&selected, 2, false, false),
            Err(EditError::SelectionNotCollapsed { id: CaretId(2) })
        );
    }

    #[test]
    fn test_expand_selection_keeps_offset_and_v_col() {
        let caret = Caret::new(CaretId(1), 3);
        let movement = CaretMovement::expand_selection(&caret, 1, 5);
        assert_eq!(movement, CaretMovement::new(0, -2, 2, true));
    }

    #[test]
    fn test_apply_clamps_to_text() {
        let text = Text::new("hello");
        let caret = Caret::new(CaretId(1), 0).with_v_col(3);

        let moved = CaretMovement::new(-5, -5, -5, false).apply(&caret, &text);
        assert_eq!((moved.offset, moved.selection_start, moved.selection_end), (0, 0, 0));
        assert_eq!(moved.v_col, 0);

        let moved = CaretMovement::new(50, 50, 50, true).apply(&caret, &text);
        assert_eq!(moved.offset, 5);
        assert_eq!(moved.v_col, 3);
    }
}
