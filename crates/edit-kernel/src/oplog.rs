//! Append-only operation log.
//!
//! Every controller operation appends exactly one [`LogEntry`]: the raw [`Intent`] that caused it
//! and the [`Edit`] it produced (empty for caret-only operations). The log is a persistent list;
//! appending shares the existing entries, so snapshots holding an older log never observe later
//! operations.

use std::collections::HashMap;
use std::sync::Arc;

use crate::carets::{Caret, CaretId};
use crate::edit::Edit;
use crate::movement::CaretMovement;

/// Kind of a logged operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// A caller-built script.
    Edit,
    /// Text inserted in front of carets.
    InsertBeforeCarets,
    /// Text inserted behind carets.
    InsertAfterCarets,
    /// A batch of caret movements.
    MoveCarets,
    /// Selections collapsed to their carets.
    DropSelections,
    /// A caret added.
    AddCaret,
    /// Selected text deleted.
    DeleteSelections,
    /// Codepoints deleted in front of carets.
    DeleteBeforeCarets,
    /// Codepoints deleted behind carets.
    DeleteAfterCarets,
}

/// The raw request behind a logged operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Apply a caller-built script.
    Edit(Edit),
    /// Insert text in front of each listed caret.
    InsertBeforeCarets(HashMap<CaretId, String>),
    /// Insert text behind each listed caret.
    InsertAfterCarets(HashMap<CaretId, String>),
    /// Move each listed caret.
    MoveCarets(HashMap<CaretId, CaretMovement>),
    /// Collapse the selections of the listed carets.
    DropSelections(Vec<CaretId>),
    /// Add a caret.
    AddCaret(Caret),
    /// Delete the selected text of the listed carets.
    DeleteSelections(Vec<CaretId>),
    /// Delete up to `count` codepoints in front of each listed caret.
    DeleteBeforeCarets(HashMap<CaretId, usize>),
    /// Delete up to `count` codepoints behind each listed caret.
    DeleteAfterCarets(HashMap<CaretId, usize>),
}

impl Intent {
    /// Kind of operation this intent requests.
    pub fn kind(&self) -> OpKind {
        match self {
            Intent::Edit(_) => OpKind::Edit,
            Intent::InsertBeforeCarets(_) => OpKind::InsertBeforeCarets,
            Intent::InsertAfterCarets(_) => OpKind::InsertAfterCarets,
            Intent::MoveCarets(_) => OpKind::MoveCarets,
            Intent::DropSelections(_) => OpKind::DropSelections,
            Intent::AddCaret(_) => OpKind::AddCaret,
            Intent::DeleteSelections(_) => OpKind::DeleteSelections,
            Intent::DeleteBeforeCarets(_) => OpKind::DeleteBeforeCarets,
            Intent::DeleteAfterCarets(_) => OpKind::DeleteAfterCarets,
        }
    }
}

/// One logged operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// What was requested.
    pub intent: Intent,
    /// The script that was applied (empty for caret-only operations).
    pub edit: Edit,
}

impl LogEntry {
    /// Kind of the logged operation.
    pub fn kind(&self) -> OpKind {
        self.intent.kind()
    }
}

#[derive(Debug)]
struct Node {
    entry: LogEntry,
    prev: Option<Arc<Node>>,
}

/// A persistent, append-only list of [`LogEntry`] values.
#[derive(Debug, Clone, Default)]
pub struct OpLog {
    head: Option<Arc<Node>>,
    len: usize,
}

impl OpLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A new log with `entry` appended. `self` is unchanged.
    pub fn append(&self, entry: LogEntry) -> OpLog {
        OpLog {
            head: Some(Arc::new(Node {
                entry,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&LogEntry> {
        self.head.as_deref().map(|node| &node.entry)
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> Vec<&LogEntry> {
        let mut entries = Vec::with_capacity(self.len);
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            entries.push(&current.entry);
            node = current.prev.as_deref();
        }
        entries.reverse();
        entries
    }
}

impl Drop for OpLog {
    fn drop(&mut self) {
        // Unlink uniquely owned nodes iteratively; a long log would overflow the stack otherwise.
        let mut node = self.head.take();
        while let Some(current) = node {
            node = match Arc::try_unwrap(current) {
                Ok(mut owned) => owned.prev.take(),
                Err(_) => None,
            };
        }
    }
}
