// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub const THINKING_TEXT: &str = "Denke nach...";
pub const CHAT_FAILURE_TEXT: &str = "Fehler beim Abrufen der Antwort.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub id: EntryId,
    pub sender: Sender,
    pub text: String,
}

impl ChatEntry {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Append-only chat log. Entries are only ever removed to drop a
/// "thinking" placeholder.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(ChatEntry {
            id,
            sender,
            text: text.into(),
        });
        id
    }

    /// Returns false when the entry was already gone.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
