//! Rope-backed text storage for movement programs

use ropey::Rope;
use std::fmt;

/// Append-friendly text buffer
///
/// Programs are built by appending blocks at the end, so the rope keeps
/// appends cheap even for long combined sequences.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of lines, counting a trailing empty line after the last newline
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// True when the buffer holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.rope.chars().all(char::is_whitespace)
    }

    /// Line without its terminator
    pub fn line(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Lines without terminators; the empty tail after a final newline is skipped
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.rope
            .lines()
            .filter(|line| line.len_chars() > 0)
            .map(|line| line.to_string().trim_end_matches(['\n', '\r']).to_string())
    }

    pub fn append(&mut self, text: &str) {
        let len = self.len_chars();
        self.rope.insert(len, text);
    }

    /// Replace the whole content
    pub fn set(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    pub fn clear(&mut self) {
        self.rope = Rope::new();
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}
