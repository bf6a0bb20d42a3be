//! Daily journal entries: one mood plus guided prompts and free writing
//! per calendar date. Saving always replaces the whole entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The guided prompt ids and their display labels.
pub const JOURNAL_PROMPTS: [(&str, &str); 4] = [
    ("onYourMind", "What's on your mind?"),
    ("gratefulFor", "What are you grateful for?"),
    ("wentWell", "What went well today?"),
    ("doDifferently", "What's one thing you'd do differently?"),
];

/// Mood scale: 1 (rough) to 5 (great), each with a fixed emoji name.
pub fn mood_emoji(value: u8) -> Option<(&'static str, &'static str)> {
    match value {
        1 => Some(("crying-face", "Rough")),
        2 => Some(("worried-face", "Meh")),
        3 => Some(("slightly-smiling-face", "Okay")),
        4 => Some(("grinning-face-with-big-eyes", "Good")),
        5 => Some(("star-struck", "Great")),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    pub emoji: String,
    pub value: u8,
}

impl Mood {
    /// Build a mood from its 1..=5 scale value.
    pub fn from_value(value: u8) -> Option<Self> {
        mood_emoji(value).map(|(emoji, _)| Self {
            emoji: emoji.to_string(),
            value,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub mood: Mood,
    #[serde(default)]
    pub prompts: BTreeMap<String, String>,
    #[serde(default)]
    pub free_write: String,
    /// Stamped by the document service on save.
    #[serde(default)]
    pub timestamp: String,
}

impl JournalEntry {
    /// Case-insensitive substring match over the free write and every
    /// prompt answer.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        if self.free_write.to_lowercase().contains(&needle) {
            return true;
        }
        self.prompts
            .values()
            .any(|answer| answer.to_lowercase().contains(&needle))
    }
}

/// Filters for journal search. Date bounds are inclusive date-keys.
#[derive(Clone, Debug, Default)]
pub struct JournalFilter {
    pub mood: Option<u8>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
