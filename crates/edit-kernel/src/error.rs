//! Error type shared by every fallible operation in the kernel.
//!
//! All variants describe contract violations by the caller (a malformed script, an unknown caret,
//! a bare move on a selected caret). Boundary conditions such as movement overshoot or
//! over-long deletion counts are clamped silently and never surface here.

use crate::carets::CaretId;

/// Errors returned by the text, edit and controller layers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// The Retain/Delete extent of a script does not cover the buffer exactly.
    #[error("edit script covers {script_len} codepoints but the text has {text_len}")]
    LengthMismatch {
        /// Sum of Retain and Delete extents in the script.
        script_len: usize,
        /// Codepoint count of the text the script was applied to.
        text_len: usize,
    },

    /// A `Delete` element captured text that differs from the buffer content.
    #[error("delete at offset {offset} expected {expected:?} but found {found:?}")]
    DeletedTextMismatch {
        /// Pre-edit offset of the deletion.
        offset: usize,
        /// Text carried by the script element.
        expected: String,
        /// Text actually present in the buffer.
        found: String,
    },

    /// A non-extending move was requested on a caret that has a selection.
    #[error("caret {id:?} has a selection; drop it before a non-extending move")]
    SelectionNotCollapsed {
        /// The offending caret.
        id: CaretId,
    },

    /// A caret id was not found in the current caret set.
    #[error("unknown caret {0:?}")]
    UnknownCaret(CaretId),

    /// A caret offset or selection bound lies outside the text.
    #[error("caret {id:?} is out of bounds for text of length {text_len}")]
    CaretOutOfBounds {
        /// The offending caret.
        id: CaretId,
        /// Codepoint count of the text.
        text_len: usize,
    },

    /// A scanner was asked to move backwards.
    #[error("scanner at {position} cannot rewind to {requested}")]
    ScannerRewind {
        /// Current scanner position.
        position: usize,
        /// Requested (smaller) position.
        requested: usize,
    },

    /// An offset lies past the end of the text.
    #[error("offset {offset} is out of bounds for text of length {text_len}")]
    OffsetOutOfBounds {
        /// Requested offset.
        offset: usize,
        /// Codepoint count of the text.
        text_len: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditError>;
