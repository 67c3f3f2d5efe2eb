//! Immutable editor snapshots.
//!
//! A [`Composite`] pairs a [`Text`] with its [`Carets`] and the [`OpLog`] that produced them.
//! Every transition returns a new snapshot; readers holding an older one keep a stable view.
//! [`Editor`] adds the configuration used to create texts.

use crate::carets::Carets;
use crate::config::EditorConfig;
use crate::edit::Edit;
use crate::error::Result;
use crate::oplog::{Intent, LogEntry, OpLog};
use crate::text::Text;

/// Text, carets and history as one immutable value.
#[derive(Debug, Clone)]
pub struct Composite {
    /// Current text.
    pub text: Text,
    /// Current carets.
    pub carets: Carets,
    /// Operations that led here.
    pub log: OpLog,
}

impl Composite {
    /// A snapshot with no carets and an empty log.
    pub fn new(text: Text) -> Self {
        Self {
            text,
            carets: Carets::default(),
            log: OpLog::new(),
        }
    }

    /// Apply a total script to the text and carry the carets across it.
    ///
    /// Carets at an insertion point end up behind the inserted text when
    /// [`Edit::insert_before_carets`] is set. Carets inside deleted ranges collapse onto the
    /// deletion point; carets that meet are merged. Visual columns are recomputed.
    pub fn edit(&self, edit: &Edit) -> Result<Composite> {
        let text = self.text.edit(edit)?;
        let stick = edit.insert_before_carets;
        let carets = Carets::new(self.carets.iter().map(|caret| {
            let offset = edit.map_offset(caret.offset, stick);
            let mut mapped = *caret;
            mapped.offset = offset;
            mapped.selection_start = edit.map_offset(caret.selection_start, stick);
            mapped.selection_end = edit.map_offset(caret.selection_end, stick);
            mapped.v_col = text.offset_to_geom_col(offset);
            mapped
        }));

        Ok(Composite {
            text,
            carets,
            log: self.log.clone(),
        })
    }

    /// Replace the caret set.
    ///
    /// Carets reaching past the end of the text are clamped onto it, and carets that meet there
    /// are merged.
    pub fn put_carets(&self, carets: Carets) -> Composite {
        let len = self.text.code_points_count();
        let carets = if carets.iter().any(|caret| caret.max_bound() > len) {
            Carets::new(carets.iter().map(|caret| caret.clamped(len)))
        } else {
            carets
        };
        Composite {
            text: self.text.clone(),
            carets,
            log: self.log.clone(),
        }
    }

    /// Append a log entry.
    pub fn log(&self, intent: Intent, edit: Edit) -> Composite {
        Composite {
            text: self.text.clone(),
            carets: self.carets.clone(),
            log: self.log.append(LogEntry { intent, edit }),
        }
    }
}

/// The snapshot handed to and returned by the controller.
#[derive(Debug, Clone)]
pub struct Editor {
    /// Current snapshot.
    pub composite: Composite,
    config: EditorConfig,
}

impl Editor {
    /// An editor over `text` with the default configuration and no carets.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, EditorConfig::default())
    }

    /// An editor over `text` with the given configuration and no carets.
    pub fn with_config(text: &str, config: EditorConfig) -> Self {
        Self {
            composite: Composite::new(Text::with_config(text, &config)),
            config,
        }
    }

    /// Same configuration, different snapshot.
    pub fn with_composite(&self, composite: Composite) -> Editor {
        Editor {
            composite,
            config: self.config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current text.
    pub fn text(&self) -> &Text {
        &self.composite.text
    }

    /// Current carets.
    pub fn carets(&self) -> &Carets {
        &self.composite.carets
    }

    /// Operation log of the current snapshot.
    pub fn log(&self) -> &OpLog {
        &self.composite.log
    }

    /// Apply a script to the current snapshot (not logged).
    pub fn edit(&self, edit: &Edit) -> Result<Editor> {
        Ok(self.with_composite(self.composite.edit(edit)?))
    }

    /// Replace the caret set (not logged). Out-of-range carets are clamped into the text.
    pub fn put_carets(&self, carets: Carets) -> Editor {
        self.with_composite(self.composite.put_carets(carets))
    }

    /// Append a log entry.
    pub fn log_op(&self, intent: Intent, edit: Edit) -> Editor {
        self.with_composite(self.composite.log(intent, edit))
    }
}
