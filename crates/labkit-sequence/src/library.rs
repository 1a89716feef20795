//! Saved sequence library.
//!
//! An ordered collection of named programs persisted as a whole through a
//! [`SnapshotStore`]. Every mutation builds the next collection, persists it
//! and only then swaps it in, so a failed write leaves memory untouched.

use crate::buffer::SequenceBuffer;
use crate::export::sanitize_name;
use crate::generator::combined_header;
use chrono::Utc;
use labkit_core::{Result, SequenceError, SnapshotStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Name given to the buffer produced by [`SequenceLibrary::combine`]
pub const COMBINED_SEQUENCE_NAME: &str = "Combined_Sequence";

/// Header lines dropped from each part when sequences are combined
const STRIPPED_PREFIXES: [&str; 4] = [
    "; Generated:",
    "; G-code Sequence:",
    "; Ready to execute",
    "; Combined",
];

/// A saved movement program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    pub content: String,
}

impl Sequence {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Result of [`SequenceLibrary::save`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Appended at the given index
    Created(usize),
    /// Replaced the same-named entry at the given index
    Overwritten(usize),
    /// The operator declined to overwrite; nothing changed
    Declined,
}

/// Direction for [`SequenceLibrary::reorder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

pub type SequenceStore = Box<dyn SnapshotStore<Vec<Sequence>>>;

/// Ordered, persisted collection of sequences
pub struct SequenceLibrary {
    sequences: Vec<Sequence>,
    store: SequenceStore,
}

impl SequenceLibrary {
    /// Empty library backed by `store`; call [`load`](Self::load) to read it
    pub fn new(store: SequenceStore) -> Self {
        Self {
            sequences: Vec::new(),
            store,
        }
    }

    /// Library populated from `store`
    pub fn open(store: SequenceStore) -> std::result::Result<Self, StoreError> {
        let mut library = Self::new(store);
        library.load()?;
        Ok(library)
    }

    /// Reload from the store; a store with nothing saved yields an empty library
    pub fn load(&mut self) -> std::result::Result<usize, StoreError> {
        self.sequences = self.store.load()?.unwrap_or_default();
        info!("Loaded {} saved sequences", self.sequences.len());
        Ok(self.sequences.len())
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().map(|s| s.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.sequences.iter().position(|s| s.name == name)
    }

    pub fn get(&self, index: usize) -> std::result::Result<&Sequence, SequenceError> {
        self.sequences
            .get(index)
            .ok_or(SequenceError::IndexOutOfRange {
                index,
                len: self.sequences.len(),
            })
    }

    /// Save `content` under `name`.
    ///
    /// A name collision asks `confirm` before overwriting. Content is stored
    /// trimmed.
    pub fn save(
        &mut self,
        name: &str,
        content: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<SaveOutcome> {
        let name = sanitize_name(name);
        if name.is_empty() {
            return Err(SequenceError::Validation("Please enter a sequence name".into()).into());
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(SequenceError::Validation(
                "Please create some G-code content first".into(),
            )
            .into());
        }

        let entry = Sequence::new(name.clone(), content);
        let mut next = self.sequences.clone();
        let outcome = match self.position(&name) {
            Some(index) => {
                let prompt = format!(
                    "G-code sequence \"{name}\" already exists. Do you want to overwrite it?"
                );
                if !confirm(&prompt) {
                    warn!("Overwrite of sequence '{}' declined", name);
                    return Ok(SaveOutcome::Declined);
                }
                next[index] = entry;
                SaveOutcome::Overwritten(index)
            }
            None => {
                next.push(entry);
                SaveOutcome::Created(next.len() - 1)
            }
        };

        self.commit(next)?;
        info!("Saved sequence '{}' ({:?})", name, outcome);
        Ok(outcome)
    }

    /// Save the buffer's content under its name and mark it saved
    pub fn save_buffer(
        &mut self,
        buffer: &mut SequenceBuffer,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<SaveOutcome> {
        let outcome = self.save(buffer.name(), &buffer.content(), confirm)?;
        if outcome != SaveOutcome::Declined {
            buffer.set_name(sanitize_name(buffer.name()));
            buffer.mark_saved();
        }
        Ok(outcome)
    }

    /// Populate `buffer` with the stored sequence, unmodified
    pub fn load_into(
        &self,
        index: usize,
        buffer: &mut SequenceBuffer,
    ) -> std::result::Result<(), SequenceError> {
        let sequence = self.get(index)?;
        *buffer = SequenceBuffer::from_saved(&sequence.name, &sequence.content);
        Ok(())
    }

    /// Swap the entry with its neighbour; returns its new index.
    ///
    /// Moving past either end is a no-op.
    pub fn reorder(&mut self, index: usize, direction: Direction) -> Result<usize> {
        self.get(index)?;
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.sequences.len() => index + 1,
            _ => return Ok(index),
        };

        let mut next = self.sequences.clone();
        next.swap(index, target);
        self.commit(next)?;
        info!("Moved sequence {} to position {}", index, target);
        Ok(target)
    }

    /// Concatenate the selected sequences in collection order under a new
    /// header. The library itself is not changed.
    pub fn combine(&self, indices: &[usize]) -> std::result::Result<SequenceBuffer, SequenceError> {
        let selected = self.selection(indices, 2)?;
        let parts: Vec<&Sequence> = selected.iter().map(|&i| &self.sequences[i]).collect();
        let names: Vec<&str> = parts.iter().map(|s| s.name.as_str()).collect();

        let mut content = combined_header(&names, Utc::now());
        for (n, sequence) in parts.iter().enumerate() {
            content.push_str(&format!("; --- Sequence {}: {} ---\n", n + 1, sequence.name));
            for line in sequence.content.lines() {
                let trimmed = line.trim();
                if trimmed.is_empty()
                    || STRIPPED_PREFIXES.iter().any(|p| trimmed.starts_with(p))
                {
                    continue;
                }
                content.push_str(line);
                content.push('\n');
            }
            content.push('\n');
        }

        let mut buffer = SequenceBuffer::named(COMBINED_SEQUENCE_NAME);
        buffer.set_content(&content);
        info!("Combined {} sequences", parts.len());
        Ok(buffer)
    }

    /// Remove the selected sequences once `confirm` agrees.
    ///
    /// Returns the removed entries in collection order, or nothing when the
    /// confirmation was declined.
    pub fn delete(
        &mut self,
        indices: &[usize],
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Vec<Sequence>> {
        let selected = self.selection(indices, 1)?;
        let names: Vec<&str> = selected
            .iter()
            .map(|&i| self.sequences[i].name.as_str())
            .collect();
        let prompt = format!(
            "Are you sure you want to delete the following sequence(s)?\n{}",
            names.join("\n")
        );
        if !confirm(&prompt) {
            warn!("Deletion of {} sequence(s) declined", selected.len());
            return Ok(Vec::new());
        }

        let mut next = self.sequences.clone();
        let mut removed: Vec<Sequence> = selected.iter().rev().map(|&i| next.remove(i)).collect();
        removed.reverse();

        self.commit(next)?;
        info!("Deleted {} sequence(s)", removed.len());
        Ok(removed)
    }

    /// Distinct, in-range indices in ascending order
    fn selection(
        &self,
        indices: &[usize],
        required: usize,
    ) -> std::result::Result<BTreeSet<usize>, SequenceError> {
        let selected: BTreeSet<usize> = indices.iter().copied().collect();
        if selected.len() < required {
            return Err(SequenceError::InsufficientSelection {
                required,
                given: selected.len(),
            });
        }
        if let Some(&index) = selected.iter().find(|&&i| i >= self.sequences.len()) {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.sequences.len(),
            });
        }
        Ok(selected)
    }

    fn commit(&mut self, next: Vec<Sequence>) -> std::result::Result<(), StoreError> {
        self.store.save(&next)?;
        self.sequences = next;
        Ok(())
    }
}

impl std::fmt::Debug for SequenceLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceLibrary")
            .field("sequences", &self.sequences)
            .finish_non_exhaustive()
    }
}
