//! Immutable, codepoint-indexed text.
//!
//! [`Text`] wraps a [`ropey::Rope`]; clones share structure, so every edit produces a new value
//! while older snapshots stay readable. All offsets are codepoint (`char`) offsets.

use std::fmt;
use std::ops::Range;

use ropey::Rope;

use crate::config::EditorConfig;
use crate::edit::{Edit, EditOp};
use crate::error::{EditError, Result};
use crate::layout::geom_col;

/// An immutable text buffer.
#[derive(Clone)]
pub struct Text {
    rope: Rope,
    tab_width: usize,
    verify_deleted_text: bool,
}

impl Text {
    /// Create a text with the default configuration.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, &EditorConfig::default())
    }

    /// Create a text that measures columns and verifies deletions per `config`.
    pub fn with_config(text: &str, config: &EditorConfig) -> Self {
        Self {
            rope: Rope::from_str(text),
            tab_width: config.tab_width.max(1),
            verify_deleted_text: config.verify_deleted_text,
        }
    }

    /// Number of codepoints in the text.
    pub fn code_points_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Tab width used by [`Text::offset_to_geom_col`].
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Copy a codepoint range out of the text. The range is clamped to the text.
    pub fn slice_to_string(&self, range: Range<usize>) -> String {
        let len = self.rope.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Apply a total edit script, producing a new text.
    ///
    /// The script must consume exactly [`Text::code_points_count`] codepoints. When deletion
    /// verification is enabled, every `Delete` must carry the text it removes.
    pub fn edit(&self, edit: &Edit) -> Result<Text> {
        let text_len = self.code_points_count();
        let script_len = edit.source_len();
        if script_len != text_len {
            return Err(EditError::LengthMismatch {
                script_len,
                text_len,
            });
        }

        let mut rope = self.rope.clone();
        // Position in `rope` as it is being rewritten; `old_pos` tracks the pre-edit offset.
        let mut pos = 0usize;
        let mut old_pos = 0usize;

        for op in &edit.ops {
            match op {
                EditOp::Retain(count) => {
                    pos += count;
                    old_pos += count;
                }
                EditOp::Insert(text) => {
                    rope.insert(pos, text);
                    pos += text.chars().count();
                }
                EditOp::Delete(text) => {
                    let len = text.chars().count();
                    if self.verify_deleted_text {
                        let found = self.rope.slice(old_pos..old_pos + len);
                        if found != text.as_str() {
                            return Err(EditError::DeletedTextMismatch {
                                offset: old_pos,
                                expected: text.clone(),
                                found: found.to_string(),
                            });
                        }
                    }
                    rope.remove(pos..pos + len);
                    old_pos += len;
                }
            }
        }

        tracing::trace!(
            before = text_len,
            after = rope.len_chars(),
            ops = edit.ops.len(),
            "applied edit script"
        );

        Ok(Text {
            rope,
            tab_width: self.tab_width,
            verify_deleted_text: self.verify_deleted_text,
        })
    }

    /// A sequential scanner positioned at the start of the text.
    pub fn zipper(&self) -> TextZipper<'_> {
        TextZipper {
            rope: &self.rope,
            position: 0,
        }
    }

    /// Visual column of `offset` within its line.
    ///
    /// Offsets past the end are clamped to the end of the text.
    pub fn offset_to_geom_col(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let line_start = self.rope.line_to_char(line);
        geom_col(self.rope.slice(line_start..offset).chars(), self.tab_width)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("text", &self.rope.to_string())
            .field("tab_width", &self.tab_width)
            .finish()
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}

impl Eq for Text {}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text::new(text)
    }
}

/// Forward-only scanner over a [`Text`].
///
/// Each step consumes the scanner and returns the advanced one, so a scan position can never be
/// shared between two callers or moved backwards by accident.
#[derive(Debug, Clone, Copy)]
pub struct TextZipper<'a> {
    rope: &'a Rope,
    position: usize,
}

impl<'a> TextZipper<'a> {
    /// Current codepoint position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Advance to `offset` without consuming anything.
    pub fn scan_to_codepoint(self, offset: usize) -> Result<Self> {
        let text_len = self.rope.len_chars();
        if offset < self.position {
            return Err(EditError::ScannerRewind {
                position: self.position,
                requested: offset,
            });
        }
        if offset > text_len {
            return Err(EditError::OffsetOutOfBounds { offset, text_len });
        }
        Ok(Self {
            rope: self.rope,
            position: offset,
        })
    }

    /// Append the next `count` codepoints to `sink` (fewer at end of text) and advance past them.
    pub fn consume(self, count: usize, sink: &mut String) -> Self {
        let end = self.position.saturating_add(count).min(self.rope.len_chars());
        for chunk in self.rope.slice(self.position..end).chunks() {
            sink.push_str(chunk);
        }
        Self {
            rope: self.rope,
            position: end,
        }
    }
}
