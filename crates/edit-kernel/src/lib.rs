#![warn(missing_docs)]
//! Edit Kernel - Headless Multi-Caret Editing Core
//!
//! # Overview
//!
//! `edit-kernel` turns high-level editing intents (insert at carets, delete selections, move
//! carets, expand selections) into canonical Retain/Insert/Delete edit scripts, applies them
//! atomically to an immutable rope-backed text, and keeps a consistent, offset-sorted caret set.
//! It also provides cursors over sorted interval streams and a merge of two such streams.
//!
//! Every coordinate is a **codepoint offset** (Unicode scalar values), never a byte offset.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Controller (intents -> one logged step)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Editor / Composite snapshots + OpLog       │  ← Immutable state
//! ├─────────────────────────────────────────────┤
//! │  Edit scripts  │  Carets & movements        │  ← Algebra
//! ├─────────────────────────────────────────────┤
//! │  Text (Rope) + TextZipper                   │  ← Storage
//! └─────────────────────────────────────────────┘
//!          Interval streams (independent)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use edit_kernel::{Caret, CaretId, CaretMovement, Carets, Editor, controller};
//!
//! let editor = Editor::new("hello").put_carets(Carets::single(Caret::new(CaretId(1), 1)));
//!
//! // Select "ell" by extending the caret to offset 4.
//! let caret = *editor.carets().get(CaretId(1)).unwrap();
//! let movement = CaretMovement::move_to(&caret, 4, true, false).unwrap();
//! let editor = controller::move_carets(&editor, HashMap::from([(CaretId(1), movement)])).unwrap();
//!
//! // Delete it.
//! let editor = controller::delete_selected_text(&editor, vec![CaretId(1)]).unwrap();
//! assert_eq!(editor.text().to_string(), "ho");
//! assert_eq!(editor.log().len(), 2);
//! ```
//!
//! # Module Description
//!
//! - [`text`] - Immutable text and its forward scanner
//! - [`edit`] - Edit scripts and their normalization
//! - [`carets`] - Carets and the offset-sorted caret set
//! - [`movement`] - Relative caret movements
//! - [`intervals`] - Sorted interval cursors and their merge
//! - [`oplog`] - Append-only operation log
//! - [`composite`] - Editor snapshots
//! - [`controller`] - Operations layer

pub mod carets;
pub mod composite;
pub mod config;
pub mod controller;
pub mod edit;
pub mod error;
pub mod intervals;
pub mod layout;
pub mod movement;
pub mod oplog;
pub mod text;

pub use carets::{Caret, CaretId, Carets};
pub use composite::{Composite, Editor};
pub use config::EditorConfig;
pub use edit::{Edit, EditOp};
pub use error::{EditError, Result};
pub use intervals::{Interval, IntervalsIterator, ListIterator, MergingIterator};
pub use movement::CaretMovement;
pub use oplog::{Intent, LogEntry, OpKind, OpLog};
pub use text::{Text, TextZipper};
