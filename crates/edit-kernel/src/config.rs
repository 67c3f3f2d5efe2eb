//! Editor configuration.

/// Default tab width (in cells) used when computing geometric columns.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Options shared by a [`crate::Editor`] and the [`crate::Text`] values it creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Tab stop width in cells. A value of 0 is treated as 1.
    pub tab_width: usize,
    /// Whether [`crate::Text::edit`] checks that every `Delete` element carries the exact text
    /// present in the buffer.
    ///
    /// Deleted text is what makes [`crate::Edit::inverse`] exact, so this is on by default.
    pub verify_deleted_text: bool,
}

impl EditorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            verify_deleted_text: true,
        }
    }

    /// Set the tab width.
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    /// Enable or disable deleted-text verification.
    pub fn with_verify_deleted_text(mut self, verify: bool) -> Self {
        self.verify_deleted_text = verify;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}
