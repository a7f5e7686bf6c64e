//! Session journal - an append-mostly log of what happened at the table.

use serde::{Deserialize, Serialize};
use spaceaces_logic::sector::Timestamp;

pub type EntryId = String;

/// What a journal entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Note,
    Roll,
    Travel,
    Damage,
    Reward,
    Encounter,
    MissionUpdate,
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub timestamp: Timestamp,
    pub kind: EntryKind,
    /// Generated description, e.g. a roll summary.
    pub summary: String,
    /// Sectors, rolls, missions... this entry refers to.
    pub entity_ids: Vec<String>,
    pub session_id: Option<String>,
    /// Free text added by the player.
    pub note: Option<String>,
}

/// Journal entries in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<JournalEntry>,
    next_id: u64,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Append an entry and return its id.
    pub fn record(
        &mut self,
        kind: EntryKind,
        summary: impl Into<String>,
        entity_ids: Vec<String>,
        session_id: Option<String>,
        note: Option<String>,
        now: Timestamp,
    ) -> EntryId {
        self.next_id += 1;
        let id = format!("entry-{}", self.next_id);
        self.entries.push(JournalEntry {
            id: id.clone(),
            timestamp: now,
            kind,
            summary: summary.into(),
            entity_ids,
            session_id,
            note,
        });
        id
    }

    pub fn update_note(&mut self, id: &str, note: Option<String>) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.note = note;
        }
    }

    pub fn delete(&mut self, id: &str) -> Option<JournalEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }
}
