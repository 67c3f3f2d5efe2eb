//! Controller: turns per-caret intents into one atomic transition.
//!
//! Each entry point reads the current [`Editor`] snapshot, builds the complete edit script or
//! caret update in memory, applies it in one step and appends exactly one log entry. On error
//! nothing is applied and the input snapshot is still the current one.
//!
//! Scripts are built from caret offsets taken from the same pre-edit snapshot, so an insertion
//! at one caret never shifts the coordinates used for the next caret.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use edit_kernel::{Caret, CaretId, Carets, EditOp, Editor, controller};
//!
//! let editor = Editor::new("ab").put_carets(Carets::single(Caret::new(CaretId(1), 1)));
//! let editor = controller::insert_before_carets(
//!     &editor,
//!     HashMap::from([(CaretId(1), "X".to_string())]),
//! )
//! .unwrap();
//!
//! assert_eq!(editor.text().to_string(), "aXb");
//! let logged = editor.log().last().unwrap();
//! assert_eq!(
//!     logged.edit.ops,
//!     vec![EditOp::Retain(1), EditOp::Insert("X".to_string()), EditOp::Retain(1)]
//! );
//! ```

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::carets::{Caret, CaretId};
use crate::composite::Editor;
use crate::edit::{Edit, EditOp};
use crate::error::{EditError, Result};
use crate::movement::CaretMovement;
use crate::oplog::Intent;

fn create_carets_insertion_operation(
    editor: &Editor,
    insertions: &HashMap<CaretId, String>,
) -> Vec<EditOp> {
    let mut ops = Vec::new();
    let mut prev_caret_offset = 0usize;
    for caret in editor.carets() {
        if let Some(text) = insertions.get(&caret.id) {
            ops.push(EditOp::Retain(caret.offset.saturating_sub(prev_caret_offset)));
            ops.push(EditOp::Insert(text.clone()));
            prev_caret_offset = caret.offset;
        }
    }
    Edit::retain_to_end(ops, editor.text().code_points_count())
}

fn apply_and_log(editor: &Editor, edit: Edit, intent: Intent) -> Result<Editor> {
    let kind = intent.kind();
    let edited = editor.edit(&edit)?;
    tracing::debug!(
        ?kind,
        ops = edit.ops.len(),
        before = editor.text().code_points_count(),
        after = edited.text().code_points_count(),
        carets = edited.carets().len(),
        "applied edit"
    );
    tracing::trace!(?kind, ?edit, "edit script");
    Ok(edited.log_op(intent, edit))
}

/// Apply a caller-built total script.
pub fn edit(editor: &Editor, edit: Edit) -> Result<Editor> {
    apply_and_log(editor, edit.clone(), Intent::Edit(edit))
}

/// Insert text at each listed caret; the carets end up behind the inserted text.
///
/// Carets without an entry are left alone; entries for unknown ids are ignored.
pub fn insert_before_carets(editor: &Editor, insertions: HashMap<CaretId, String>) -> Result<Editor> {
    let ops = create_carets_insertion_operation(editor, &insertions);
    apply_and_log(
        editor,
        Edit::new(ops, true),
        Intent::InsertBeforeCarets(insertions),
    )
}

/// Insert text at each listed caret; the carets stay in front of the inserted text.
pub fn insert_after_carets(editor: &Editor, insertions: HashMap<CaretId, String>) -> Result<Editor> {
    let ops = create_carets_insertion_operation(editor, &insertions);
    apply_and_log(
        editor,
        Edit::new(ops, false),
        Intent::InsertAfterCarets(insertions),
    )
}

/// Apply a batch of movements as one logged operation.
///
/// Results are clamped into the text. Visual columns are recomputed from the clamped offset
/// unless a movement keeps them.
pub fn move_carets(editor: &Editor, movements: HashMap<CaretId, CaretMovement>) -> Result<Editor> {
    let carets = editor.carets();
    if let Some(unknown) = movements.keys().find(|id| !carets.contains(**id)) {
        return Err(EditError::UnknownCaret(*unknown));
    }

    let text = editor.text();
    // Pre-move offset order keeps the collapse policy independent of map iteration order.
    let updates: Vec<Caret> = carets
        .iter()
        .filter_map(|caret| movements.get(&caret.id).map(|mv| mv.apply(caret, text)))
        .collect();

    tracing::debug!(moved = updates.len(), carets = carets.len(), "moving carets");
    let merged = carets.merge(updates);
    let identity = Edit::identity(text.code_points_count());
    Ok(editor
        .put_carets(merged)
        .log_op(Intent::MoveCarets(movements), identity))
}

/// Collapse the selections of the listed carets onto their offsets.
pub fn drop_selections(editor: &Editor, caret_ids: Vec<CaretId>) -> Result<Editor> {
    let carets = editor.carets();
    let updates = caret_ids
        .iter()
        .map(|&id| {
            let caret = carets.get(id).ok_or(EditError::UnknownCaret(id))?;
            Ok(Caret {
                selection_start: caret.offset,
                selection_end: caret.offset,
                ..*caret
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(carets = updates.len(), "dropping selections");
    let merged = carets.merge(updates);
    let identity = Edit::identity(editor.text().code_points_count());
    Ok(editor
        .put_carets(merged)
        .log_op(Intent::DropSelections(caret_ids), identity))
}

/// Add (or replace, by id) a caret.
pub fn add_caret(editor: &Editor, caret: Caret) -> Result<Editor> {
    let text_len = editor.text().code_points_count();
    if caret.max_bound() > text_len {
        return Err(EditError::CaretOutOfBounds {
            id: caret.id,
            text_len,
        });
    }

    tracing::debug!(id = ?caret.id, offset = caret.offset, "adding caret");
    let merged = editor.carets().merge([caret]);
    Ok(editor
        .put_carets(merged)
        .log_op(Intent::AddCaret(caret), Edit::identity(text_len)))
}

/// Build a deletion script for codepoint ranges of the current text.
///
/// Ranges are visited by ascending start with one forward scan; overlapping ranges are deleted
/// once as their union and empty ranges are skipped.
fn deletion_ops(editor: &Editor, mut ranges: Vec<Range<usize>>) -> Result<Vec<EditOp>> {
    let text = editor.text();
    ranges.retain(|range| range.start < range.end);
    ranges.sort_by_key(|range| range.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start < last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }

    let mut ops = Vec::with_capacity(merged.len() * 2 + 1);
    let mut last_end = 0usize;
    let mut zipper = text.zipper();
    for range in merged {
        let mut deleted = String::new();
        zipper = zipper
            .scan_to_codepoint(range.start)?
            .consume(range.end - range.start, &mut deleted);
        ops.push(EditOp::Retain(range.start - last_end));
        ops.push(EditOp::Delete(deleted));
        last_end = range.end;
    }

    Ok(Edit::retain_to_end(ops, text.code_points_count()))
}

/// Delete the selected text of the listed carets.
///
/// Carets without a selection, or not listed, contribute nothing.
pub fn delete_selected_text(editor: &Editor, caret_ids: Vec<CaretId>) -> Result<Editor> {
    let targets: HashSet<CaretId> = caret_ids.iter().copied().collect();
    let ranges = editor
        .carets()
        .iter()
        .filter(|caret| targets.contains(&caret.id) && caret.has_selection())
        .map(Caret::selection_range)
        .collect();

    let ops = deletion_ops(editor, ranges)?;
    apply_and_log(
        editor,
        Edit::new(ops, false),
        Intent::DeleteSelections(caret_ids),
    )
}

#[derive(Clone, Copy)]
enum Side {
    Before,
    After,
}

fn ranges_around_carets(
    editor: &Editor,
    counts: &HashMap<CaretId, usize>,
    side: Side,
) -> Vec<Range<usize>> {
    let text_len = editor.text().code_points_count();
    editor
        .carets()
        .iter()
        .filter_map(|caret| {
            let count = counts.get(&caret.id).copied().filter(|&count| count != 0)?;
            Some(match side {
                Side::Before => caret.offset.saturating_sub(count)..caret.offset,
                Side::After => caret.offset..caret.offset.saturating_add(count).min(text_len),
            })
        })
        .collect()
}

/// Delete up to `count` codepoints in front of each listed caret.
///
/// Counts reaching past the start of the text are clamped; zero counts are ignored.
pub fn delete_before_carets(editor: &Editor, counts: HashMap<CaretId, usize>) -> Result<Editor> {
    let ops = deletion_ops(editor, ranges_around_carets(editor, &counts, Side::Before))?;
    apply_and_log(
        editor,
        Edit::new(ops, false),
        Intent::DeleteBeforeCarets(counts),
    )
}

/// Delete up to `count` codepoints behind each listed caret.
///
/// Counts reaching past the end of the text are clamped; zero counts are ignored.
pub fn delete_after_carets(editor: &Editor, counts: HashMap<CaretId, usize>) -> Result<Editor> {
    let ops = deletion_ops(editor, ranges_around_carets(editor, &counts, Side::After))?;
    apply_and_log(
        editor,
        Edit::new(ops, false),
        Intent::DeleteAfterCarets(counts),
    )
}

/// Run a logged intent against `editor`.
///
/// Replaying the intents of a log against the snapshot it started from reproduces the log.
pub fn execute(editor: &Editor, intent: Intent) -> Result<Editor> {
    match intent {
        Intent::Edit(script) => edit(editor, script),
        Intent::InsertBeforeCarets(insertions) => insert_before_carets(editor, insertions),
        Intent::InsertAfterCarets(insertions) => insert_after_carets(editor, insertions),
        Intent::MoveCarets(movements) => move_carets(editor, movements),
        Intent::DropSelections(ids) => drop_selections(editor, ids),
        Intent::AddCaret(caret) => add_caret(editor, caret),
        Intent::DeleteSelections(ids) => delete_selected_text(editor, ids),
        Intent::DeleteBeforeCarets(counts) => delete_before_carets(editor, counts),
        Intent::DeleteAfterCarets(counts) => delete_after_carets(editor, counts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carets::Carets;
    use crate::oplog::OpKind;

    fn editor_with(text: &str, carets: &[Caret]) -> Editor {
        Editor::new(text).put_carets(Carets::new(carets.iter().copied()))
    }

    fn last_ops(editor: &Editor) -> Vec<EditOp> {
        editor.log().last().map(|e| e.edit.ops.clone()).unwrap_or_default()
    }

    #[test]
    fn test_insert_before_carets_single() {
        let editor = editor_with("ab", &[Caret::new(CaretId(1), 1)]);
        let edited = insert_before_carets(&editor, HashMap::from([(CaretId(1), "X".to_string())])).unwrap();

        assert_eq!(edited.text().to_string(), "aXb");
        assert_eq!(
            last_ops(&edited),
            vec![EditOp::Retain(1), EditOp::Insert("X".to_string()), EditOp::Retain(1)]
        );
        assert_eq!(edited.carets().get(CaretId(1)).map(|c| c.offset), Some(2));
        assert_eq!(edited.log().last().map(|e| e.kind()), Some(OpKind::InsertBeforeCarets));
    }

    #[test]
    fn test_insert_after_carets_keeps_caret_in_front() {
        let editor = editor_with("ab", &[Caret::new(CaretId(1), 1)]);
        let edited = insert_after_carets(&editor, HashMap::from([(CaretId(1), "XY".to_string())])).unwrap();
        assert_eq!(edited.text().to_string(), "aXYb");
        assert_eq!(edited.carets().get(CaretId(1)).map(|c| c.offset), Some(1));
        assert!(!edited.log().last().unwrap().edit.insert_before_carets);
    }

    #[test]
    fn test_insert_uses_pre_edit_offsets() {
        let editor = editor_with(
            "abcd",
            &[Caret::new(CaretId(1), 1), Caret::new(CaretId(2), 2), Caret::new(CaretId(3), 3)],
        );
        let edited = insert_before_carets(
            &editor,
            HashMap::from([(CaretId(1), "XX".to_string()), (CaretId(3), "Y".to_string())]),
        )
        .unwrap();
        assert_eq!(edited.text().to_string(), "aXXbcYd");
        assert_eq!(
            last_ops(&edited),
            vec![
                EditOp::Retain(1),
                EditOp::Insert("XX".to_string()),
                EditOp::Retain(2),
                EditOp::Insert("Y".to_string()),
                EditOp::Retain(1),
            ]
        );
        let offsets: Vec<usize> = edited.carets().iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![3, 4, 6]);
    }

    #[test]
    fn test_delete_selected_text() {
        let editor = editor_with("hello", &[Caret::with_selection(CaretId(1), 4, 1, 4)]);
        let edited = delete_selected_text(&editor, vec![CaretId(1)]).unwrap();

        assert_eq!(edited.text().to_string(), "ho");
        assert_eq!(
            last_ops(&edited),
            vec![EditOp::Retain(1), EditOp::Delete("ell".to_string()), EditOp::Retain(1)]
        );
        let caret = edited.carets().get(CaretId(1)).copied().unwrap();
        assert_eq!((caret.offset, caret.selection_start, caret.selection_end), (1, 1, 1));
    }

    #[test]
    fn test_delete_selected_text_skips_untargeted_and_collapsed() {
        let editor = editor_with(
            "abcdef",
            &[
                Caret::with_selection(CaretId(1), 0, 0, 2),
                Caret::new(CaretId(2), 3),
                Caret::with_selection(CaretId(3), 5, 4, 5),
            ],
        );
        let edited = delete_selected_text(&editor, vec![CaretId(2), CaretId(3)]).unwrap();
        assert_eq!(edited.text().to_string(), "abcdf");
        assert_eq!(
            last_ops(&edited),
            vec![EditOp::Retain(4), EditOp::Delete("e".to_string()), EditOp::Retain(1)]
        );
    }

    #[test]
    fn test_delete_before_carets_clamps_at_start() {
        let editor = editor_with("abcdef", &[Caret::new(CaretId(1), 2), Caret::new(CaretId(2), 5)]);
        let edited = delete_before_carets(
            &editor,
            HashMap::from([(CaretId(1), 10), (CaretId(2), 1)]),
        )
        .unwrap();
        assert_eq!(edited.text().to_string(), "cdf");
        assert_eq!(
            last_ops(&edited),
            vec![
                EditOp::Retain(0),
                EditOp::Delete("ab".to_string()),
                EditOp::Retain(2),
                EditOp::Delete("e".to_string()),
                EditOp::Retain(1),
            ]
        );
    }

    #[test]
    fn test_delete_after_carets_clamps_at_end() {
        let editor = editor_with("abcdef", &[Caret::new(CaretId(1), 1), Caret::new(CaretId(2), 4)]);
        let edited = delete_after_carets(
            &editor,
            HashMap::from([(CaretId(1), 2), (CaretId(2), 100)]),
        )
        .unwrap();
        assert_eq!(edited.text().to_string(), "ad");
        assert_eq!(
            last_ops(&edited),
            vec![
                EditOp::Retain(1),
                EditOp::Delete("bc".to_string()),
                EditOp::Retain(1),
                EditOp::Delete("ef".to_string()),
                EditOp::Retain(0),
            ]
        );
    }

    #[test]
    fn test_overlapping_deletions_delete_the_union() {
        // Backspacing 4 at offset 5 reaches past the range deleted for the caret at 3.
        let editor = editor_with("abcdefg", &[Caret::new(CaretId(1), 3), Caret::new(CaretId(2), 5)]);
        let edited = delete_before_carets(
            &editor,
            HashMap::from([(CaretId(1), 1), (CaretId(2), 4)]),
        )
        .unwrap();
        assert_eq!(edited.text().to_string(), "afg");
        assert_eq!(
            last_ops(&edited),
            vec![EditOp::Retain(1), EditOp::Delete("bcde".to_string()), EditOp::Retain(2)]
        );
        assert_eq!(edited.carets().len(), 1);
    }

    #[test]
    fn test_overlapping_selections_delete_the_union() {
        let editor = editor_with(
            "abcdefgh",
            &[
                Caret::with_selection(CaretId(1), 2, 2, 3),
                Caret::with_selection(CaretId(2), 5, 0, 5),
            ],
        );
        let edited = delete_selected_text(&editor, vec![CaretId(1), CaretId(2)]).unwrap();
        assert_eq!(edited.text().to_string(), "fgh");
    }

    #[test]
    fn test_zero_count_deletion_is_a_noop() {
        let editor = editor_with("abc", &[Caret::new(CaretId(1), 1)]);
        let edited = delete_after_carets(&editor, HashMap::from([(CaretId(1), 0)])).unwrap();
        assert_eq!(edited.text().to_string(), "abc");
        assert_eq!(last_ops(&edited), vec![EditOp::Retain(3)]);
        assert_eq!(edited.log().len(), 1);
    }

    #[test]
    fn test_move_carets_clamps_and_logs_once() {
        let editor = editor_with("hello", &[Caret::new(CaretId(1), 0), Caret::new(CaretId(2), 3)]);
        let movements = HashMap::from([
            (CaretId(1), CaretMovement::new(-5, -5, -5, false)),
            (CaretId(2), CaretMovement::new(10, 10, 10, false)),
        ]);
        let moved = move_carets(&editor, movements).unwrap();

        assert_eq!(moved.carets().get(CaretId(1)).map(|c| c.offset), Some(0));
        let second = moved.carets().get(CaretId(2)).copied().unwrap();
        assert_eq!((second.offset, second.v_col), (5, 5));
        assert_eq!(moved.log().len(), 1);
        assert_eq!(moved.log().last().unwrap().edit, Edit::identity(5));
    }

    #[test]
    fn test_caret_only_operations_log_applicable_scripts() {
        let editor = editor_with("abc", &[Caret::with_selection(CaretId(1), 2, 1, 2)]);
        let moved = move_carets(
            &editor,
            HashMap::from([(CaretId(1), CaretMovement::new(1, 0, 1, false))]),
        )
        .unwrap();
        let dropped = drop_selections(&moved, vec![CaretId(1)]).unwrap();
        let added = add_caret(&dropped, Caret::new(CaretId(2), 0)).unwrap();

        for entry in added.log().entries() {
            assert_eq!(entry.edit.source_len(), 3);
            assert_eq!(editor.text().edit(&entry.edit).unwrap(), *editor.text());
            assert_eq!(editor.text().edit(&entry.edit.inverse()).unwrap(), *editor.text());
        }
        assert_eq!(added.log().len(), 3);
    }

    #[test]
    fn test_move_carets_rejects_unknown_id() {
        let editor = editor_with("hello", &[Caret::new(CaretId(1), 0)]);
        let result = move_carets(
            &editor,
            HashMap::from([(CaretId(9), CaretMovement::new(1, 1, 1, false))]),
        );
        assert!(matches!(result, Err(EditError::UnknownCaret(CaretId(9)))));
    }

    #[test]
    fn test_drop_selections_keeps_offset_and_v_col() {
        let caret = Caret::with_selection(CaretId(1), 4, 1, 4).with_v_col(7);
        let editor = editor_with("hello", &[caret]);
        let dropped = drop_selections(&editor, vec![CaretId(1)]).unwrap();
        let caret = dropped.carets().get(CaretId(1)).copied().unwrap();
        assert_eq!((caret.offset, caret.selection_start, caret.selection_end, caret.v_col), (4, 4, 4, 7));
        assert_eq!(dropped.log().last().map(|e| e.kind()), Some(OpKind::DropSelections));
    }

    #[test]
    fn test_add_caret_validates_bounds() {
        let editor = Editor::new("abc");
        let added = add_caret(&editor, Caret::new(CaretId(1), 3)).unwrap();
        assert_eq!(added.carets().len(), 1);
        assert_eq!(
            add_caret(&editor, Caret::with_selection(CaretId(2), 1, 1, 4)).unwrap_err(),
            EditError::CaretOutOfBounds {
                id: CaretId(2),
                text_len: 3
            }
        );
    }

    #[test]
    fn test_failed_edit_leaves_no_log_entry() {
        let editor = Editor::new("abc");
        let result = edit(&editor, Edit::new(vec![EditOp::Retain(2)], false));
        assert!(matches!(result, Err(EditError::LengthMismatch { .. })));
        assert!(editor.log().is_empty());
    }

    #[test]
    fn test_edit_rejects_overflowing_script() {
        let editor = Editor::new("ab");
        let result = edit(
            &editor,
            Edit::new(vec![EditOp::Retain(usize::MAX), EditOp::Retain(3)], false),
        );
        assert_eq!(
            result.unwrap_err(),
            EditError::LengthMismatch {
                script_len: usize::MAX,
                text_len: 2
            }
        );

        let result = edit(
            &editor,
            Edit::new(vec![EditOp::Delete("ab".to_string()), EditOp::Retain(usize::MAX)], false),
        );
        assert!(matches!(result, Err(EditError::LengthMismatch { .. })));
    }
}
