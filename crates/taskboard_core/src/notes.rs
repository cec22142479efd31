use crate::markup;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesMode {
    Viewing,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotesControls {
    pub edit_visible: bool,
    pub done_visible: bool,
}

/// View/edit surface over the single notes text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesEditor {
    source: String,
    buffer: String,
    mode: NotesMode,
}

impl Default for NotesEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesEditor {
    pub fn new() -> Self {
        Self {
            source: String::new(),
            buffer: String::new(),
            mode: NotesMode::Viewing,
        }
    }

    pub fn mode(&self) -> NotesMode {
        self.mode
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn controls(&self) -> NotesControls {
        let editing = self.mode == NotesMode::Editing;
        NotesControls {
            edit_visible: !editing,
            done_visible: editing,
        }
    }

    /// Seeds the stored text, e.g. from the initial fetch.
    pub fn load(&mut self, text: String) {
        self.source = text;
    }

    /// Rendered HTML while viewing; `None` while the raw text is exposed.
    pub fn view_html(&self) -> Option<String> {
        match self.mode {
            NotesMode::Viewing => Some(markup::render(&self.source)),
            NotesMode::Editing => None,
        }
    }

    pub fn begin_edit(&mut self, fetched: String) {
        debug!(len = fetched.len(), "notes editing started");
        self.source = fetched.clone();
        self.buffer = fetched;
        self.mode = NotesMode::Editing;
    }

    /// Replaces the raw text and returns what should be saved. Blank text
    /// is never saved, and input outside editing mode is ignored.
    pub fn input(&mut self, text: &str) -> Option<String> {
        if self.mode != NotesMode::Editing {
            return None;
        }
        self.buffer = text.to_string();
        savable(&self.buffer)
    }

    /// Leaves editing mode, keeping the raw text as the new source. Returns
    /// the text for the final save, if it is not blank.
    pub fn finish(&mut self) -> Option<String> {
        if self.mode != NotesMode::Editing {
            return None;
        }
        self.source = std::mem::take(&mut self.buffer);
        self.mode = NotesMode::Viewing;
        debug!(len = self.source.len(), "notes editing finished");
        savable(&self.source)
    }
}

fn savable(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
