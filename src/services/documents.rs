//! Document service: loading, saving and initializing per-user documents
//! across the local cache and the remote store.
//!
//! Sync policy: reads prefer the remote copy and fall back to the local
//! cache; writes hit the local cache synchronously and then push to the
//! remote store in a background task without waiting for the result.
//! Remote failures are logged and dropped, never surfaced to callers, and
//! never retried. Concurrent writers are last-write-wins on both sides.

use std::sync::Arc;

use crate::domain::{LocalCache, RemoteStore};
use crate::models::document::{ProfileSeed, Settings, SettingsPatch, UserDocument};
use crate::models::journal::{JournalEntry, JournalFilter};
use crate::models::week::{Rule, TimerLog, TimerMode, WeekRecord};
use crate::utils::ids::new_id;

/// A timer session about to be logged; id and timestamp are assigned here.
#[derive(Clone, Debug)]
pub struct NewTimerLog {
    pub activity: String,
    pub minutes: u32,
    pub date: String,
    pub mode: TimerMode,
    pub tag: Option<String>,
}

/// One journal search result.
#[derive(Clone, Debug, PartialEq)]
pub struct JournalSearchHit {
    pub date: String,
    pub entry: JournalEntry,
}

pub struct DocumentService {
    local: Arc<dyn LocalCache>,
    remote: Option<Arc<dyn RemoteStore>>,
}

impl DocumentService {
    pub fn new(local: Arc<dyn LocalCache>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            local,
            remote: Some(remote),
        }
    }

    /// Local-only configuration: no background sync ever runs. This is
    /// also the only configuration safe to use outside a tokio runtime.
    pub fn local_only(local: Arc<dyn LocalCache>) -> Self {
        Self { local, remote: None }
    }

    /// Load a user's document, preferring the remote copy.
    ///
    /// A successful remote fetch overwrites the local cache entry. On
    /// remote failure (or when the remote holds nothing) the local cache
    /// entry is returned instead, or `None` if that is absent too.
    pub async fn load(&self, user_id: &str) -> Option<UserDocument> {
        if let Some(remote) = &self.remote {
            match remote.fetch(user_id).await {
                Ok(Some(document)) => {
                    if let Err(e) = self.local.put(user_id, &document) {
                        tracing::warn!("Failed to cache remote document for {}: {}", user_id, e);
                    }
                    return Some(document);
                }
                Ok(None) => {
                    tracing::debug!("No remote document for {}, using local cache", user_id);
                }
                Err(e) => {
                    tracing::warn!("Remote fetch failed for {}: {}", user_id, e);
                }
            }
        }
        self.document(user_id)
    }

    /// Save a user's document: local write first (its outcome is the
    /// return value), then a fire-and-forget remote push.
    ///
    /// Must be called within a tokio runtime when a remote store is
    /// configured, since the push runs on a spawned task.
    pub fn save(&self, user_id: &str, document: &UserDocument) -> bool {
        let saved = match self.local.put(user_id, document) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Local save failed for {}: {}", user_id, e);
                false
            }
        };

        if let Some(remote) = &self.remote {
            let remote = Arc::clone(remote);
            let user_id = user_id.to_string();
            let document = document.clone();
            tokio::spawn(async move {
                if let Err(e) = remote.push(&user_id, &document).await {
                    tracing::warn!("Background sync failed for {}: {}", user_id, e);
                }
            });
        }

        saved
    }

    /// Create the user's document on first sign-in. Idempotent: if a
    /// document already exists (remotely or locally) it is returned
    /// unchanged and nothing is written.
    pub async fn initialize(&self, user_id: &str, seed: ProfileSeed) -> UserDocument {
        if let Some(existing) = self.load(user_id).await {
            return existing;
        }

        let document = UserDocument::new(user_id, seed);
        self.save(user_id, &document);
        document
    }

    /// Read the cached document without touching the remote store.
    pub fn document(&self, user_id: &str) -> Option<UserDocument> {
        match self.local.get(user_id) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Local read failed for {}: {}", user_id, e);
                None
            }
        }
    }

    /// Drop the local cache entry. The remote copy is untouched.
    pub fn clear_local(&self, user_id: &str) -> bool {
        match self.local.remove(user_id) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Local clear failed for {}: {}", user_id, e);
                false
            }
        }
    }

    // ----- weeks -----

    /// The week record for a key, defaulting to an empty week when the
    /// document exists but has no record yet. `None` only when the user
    /// has no document at all.
    pub fn week(&self, user_id: &str, week_key: &str) -> Option<WeekRecord> {
        let document = self.document(user_id)?;
        Some(
            document
                .weeks
                .get(week_key)
                .cloned()
                .unwrap_or_default(),
        )
    }

    pub fn save_week(&self, user_id: &str, week_key: &str, week: WeekRecord) -> bool {
        let Some(mut document) = self.document(user_id) else {
            return false;
        };
        document.weeks.insert(week_key.to_string(), week);
        self.save(user_id, &document)
    }

    /// Append a timer log, creating the week record lazily if needed.
    pub fn add_timer_log(&self, user_id: &str, week_key: &str, log: NewTimerLog) -> bool {
        let Some(mut document) = self.document(user_id) else {
            return false;
        };
        let week = document.weeks.entry(week_key.to_string()).or_default();
        week.timer_logs.push(TimerLog {
            id: new_id(),
            activity: log.activity,
            minutes: log.minutes,
            date: log.date,
            mode: log.mode,
            tag: log.tag,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        self.save(user_id, &document)
    }

    /// Add measured minutes onto a career task's actual time. Returns
    /// false when the task is unknown.
    pub fn update_task_time(
        &self,
        user_id: &str,
        week_key: &str,
        task_id: &str,
        actual_minutes: u32,
    ) -> bool {
        let Some(mut document) = self.document(user_id) else {
            return false;
        };
        let Some(week) = document.weeks.get_mut(week_key) else {
            return false;
        };

        let Some(task) = week
            .friday_plan
            .career
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
        else {
            return false;
        };
        task.actual_minutes = Some(task.actual_minutes.unwrap_or(0) + actual_minutes);

        self.save(user_id, &document)
    }

    // ----- journal -----

    pub fn journal_entry(&self, user_id: &str, date_key: &str) -> Option<JournalEntry> {
        self.document(user_id)?.journal.get(date_key).cloned()
    }

    /// Save (or overwrite) the entry for a date; the timestamp is stamped
    /// here. Entries are always replaced whole.
    pub fn save_journal_entry(
        &self,
        user_id: &str,
        date_key: &str,
        mut entry: JournalEntry,
    ) -> bool {
        let Some(mut document) = self.document(user_id) else {
            return false;
        };
        entry.timestamp = chrono::Utc::now().to_rfc3339();
        document.journal.insert(date_key.to_string(), entry);
        self.save(user_id, &document)
    }

    pub fn journal_entries(
        &self,
        user_id: &str,
    ) -> std::collections::BTreeMap<String, JournalEntry> {
        self.document(user_id)
            .map(|document| document.journal)
            .unwrap_or_default()
    }

    /// Substring search across entries, optionally filtered by mood and an
    /// inclusive date-key range. Results are sorted newest first.
    pub fn search_journal(
        &self,
        user_id: &str,
        query: &str,
        filter: &JournalFilter,
    ) -> Vec<JournalSearchHit> {
        let mut hits: Vec<JournalSearchHit> = self
            .journal_entries(user_id)
            .into_iter()
            .filter(|(date, entry)| {
                if let Some(mood) = filter.mood {
                    if entry.mood.value != mood {
                        return false;
                    }
                }
                if let Some(start) = &filter.start_date {
                    if date < start {
                        return false;
                    }
                }
                if let Some(end) = &filter.end_date {
                    if date > end {
                        return false;
                    }
                }
                entry.matches_query(query)
            })
            .map(|(date, entry)| JournalSearchHit { date, entry })
            .collect();

        hits.sort_by(|a, b| b.date.cmp(&a.date));
        hits
    }

    // ----- settings -----

    pub fn settings(&self, user_id: &str) -> Option<Settings> {
        self.document(user_id).map(|document| document.settings)
    }

    /// Shallow settings merge: provided fields replace wholesale.
    pub fn update_settings(&self, user_id: &str, patch: SettingsPatch) -> bool {
        let Some(mut document) = self.document(user_id) else {
            return false;
        };
        patch.apply(&mut document.settings);
        self.save(user_id, &document)
    }

    /// Replace the reminder configuration for one rule.
    pub fn update_reminder(
        &self,
        user_id: &str,
        rule: Rule,
        config: crate::models::document::ReminderConfig,
    ) -> bool {
        let Some(mut document) = self.document(user_id) else {
            return false;
        };
        document.settings.reminders.insert(rule, config);
        self.save(user_id, &document)
    }
}
