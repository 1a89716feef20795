//! Editor buffer for the movement program being built.

use crate::text_buffer::TextBuffer;
use std::fmt;
use tracing::debug;

/// Name used when the operator has not named the sequence
pub const DEFAULT_SEQUENCE_NAME: &str = "Sample_Collection_Sequence";

/// Lifecycle of the editor buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    /// Nothing written yet
    #[default]
    Empty,
    /// Content that has not been saved (also after editing a saved sequence)
    Building,
    /// Matches what was last saved or loaded from the library
    Saved,
}

/// Named movement program under construction
#[derive(Debug, Clone)]
pub struct SequenceBuffer {
    name: String,
    text: TextBuffer,
    state: EditorState,
}

impl SequenceBuffer {
    pub fn new() -> Self {
        Self::named(DEFAULT_SEQUENCE_NAME)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: TextBuffer::new(),
            state: EditorState::Empty,
        }
    }

    /// Buffer holding a sequence loaded from the library
    pub fn from_saved(name: impl Into<String>, content: &str) -> Self {
        Self {
            name: name.into(),
            text: TextBuffer::from(content),
            state: EditorState::Saved,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Unsaved changes exist
    pub fn is_modified(&self) -> bool {
        self.state == EditorState::Building
    }

    /// Whitespace-only content counts as blank
    pub fn is_blank(&self) -> bool {
        self.text.is_blank()
    }

    pub fn text(&self) -> &TextBuffer {
        &self.text
    }

    pub fn content(&self) -> String {
        self.text.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// Append generated text; prior content is never rewritten
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.append(text);
        self.state = EditorState::Building;
        debug!("Appended {} chars to '{}'", text.len(), self.name);
    }

    /// Replace the content with an operator edit
    pub fn set_content(&mut self, text: &str) {
        self.text.set(text);
        self.state = if self.text.is_blank() {
            EditorState::Empty
        } else {
            EditorState::Building
        };
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.state = EditorState::Empty;
    }

    /// Record that the current content was persisted
    pub fn mark_saved(&mut self) {
        self.state = EditorState::Saved;
    }
}

impl Default for SequenceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SequenceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut buffer = SequenceBuffer::new();
        assert_eq!(buffer.state(), EditorState::Empty);
        assert_eq!(buffer.name(), DEFAULT_SEQUENCE_NAME);

        buffer.append("G90\n");
        assert_eq!(buffer.state(), EditorState::Building);
        assert!(buffer.is_modified());

        buffer.mark_saved();
        assert_eq!(buffer.state(), EditorState::Saved);
        assert!(!buffer.is_modified());

        buffer.append("G4 P500\n");
        assert_eq!(buffer.state(), EditorState::Building);
        assert_eq!(buffer.content(), "G90\nG4 P500\n");
    }

    #[test]
    fn test_set_content_blank_returns_to_empty() {
        let mut buffer = SequenceBuffer::from_saved("wash", "G90\n");
        assert_eq!(buffer.state(), EditorState::Saved);

        buffer.set_content("G91\n");
        assert_eq!(buffer.state(), EditorState::Building);

        buffer.set_content("  \n");
        assert_eq!(buffer.state(), EditorState::Empty);
        assert!(buffer.is_blank());
    }

    #[test]
    fn test_empty_append_keeps_state() {
        let mut buffer = SequenceBuffer::named("s");
        buffer.append("");
        assert_eq!(buffer.state(), EditorState::Empty);
    }
}
