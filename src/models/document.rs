//! The per-user document: profile, settings, weekly records and journal.
//!
//! One document per authenticated user, stored whole in both the local
//! cache and the remote blob store. The serialized shape is camelCase and
//! the `userId` field always equals the storage key.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::journal::JournalEntry;
use super::week::{Rule, WeekRecord};

/// Display metadata issued by the identity provider at first sign-in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub created_at: String,
}

/// The profile fields the identity provider hands over; everything the
/// core needs to seed a fresh document.
#[derive(Clone, Debug, Default)]
pub struct ProfileSeed {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuietHours {
    pub start: String,
    pub end: String,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            start: "22:00".to_string(),
            end: "07:00".to_string(),
        }
    }
}

/// Reminder configuration for one rule. The scheduling fields differ per
/// rule (a weekday plus time, several times a day, or an offset before the
/// bedtime target), so all of them are optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_minutes: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub reminders: BTreeMap<Rule, ReminderConfig>,
    pub quiet_hours: QuietHours,
    pub google_calendar_sync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminders: default_reminders(),
            quiet_hours: QuietHours::default(),
            google_calendar_sync: false,
        }
    }
}

/// The static default reminder table: all nine rules populated.
pub fn default_reminders() -> BTreeMap<Rule, ReminderConfig> {
    DEFAULT_REMINDERS.clone()
}

static DEFAULT_REMINDERS: Lazy<BTreeMap<Rule, ReminderConfig>> = Lazy::new(|| {
    let mut reminders = BTreeMap::new();
    reminders.insert(
        Rule::Bedtime,
        ReminderConfig {
            enabled: true,
            offset_minutes: Some(30),
            ..Default::default()
        },
    );
    reminders.insert(
        Rule::PlanFridays,
        ReminderConfig {
            enabled: true,
            day: Some("Friday".to_string()),
            time: Some("14:00".to_string()),
            ..Default::default()
        },
    );
    reminders.insert(
        Rule::MoveBy3pm,
        ReminderConfig {
            enabled: true,
            times: Some(vec!["13:00".to_string(), "14:30".to_string()]),
            ..Default::default()
        },
    );
    reminders.insert(
        Rule::Habits,
        ReminderConfig {
            enabled: true,
            time: Some("19:00".to_string()),
            ..Default::default()
        },
    );
    reminders.insert(
        Rule::BackupSlot,
        ReminderConfig {
            enabled: true,
            time: Some("20:00".to_string()),
            ..Default::default()
        },
    );
    reminders.insert(
        Rule::Adventures,
        ReminderConfig {
            enabled: true,
            day: Some("Sunday".to_string()),
            time: Some("18:00".to_string()),
            ..Default::default()
        },
    );
    reminders.insert(
        Rule::NightForYou,
        ReminderConfig {
            enabled: true,
            time: Some("08:00".to_string()),
            ..Default::default()
        },
    );
    reminders.insert(
        Rule::BatchTasks,
        ReminderConfig {
            enabled: false,
            ..Default::default()
        },
    );
    reminders.insert(
        Rule::EffortfulFirst,
        ReminderConfig {
            enabled: true,
            time: Some("18:00".to_string()),
            ..Default::default()
        },
    );
    reminders
});

/// Shallow settings update: only the provided top-level fields are
/// replaced, each wholesale.
#[derive(Clone, Debug, Default)]
pub struct SettingsPatch {
    pub reminders: Option<BTreeMap<Rule, ReminderConfig>>,
    pub quiet_hours: Option<QuietHours>,
    pub google_calendar_sync: Option<bool>,
}

impl SettingsPatch {
    pub fn apply(self, settings: &mut Settings) {
        if let Some(reminders) = self.reminders {
            settings.reminders = reminders;
        }
        if let Some(quiet_hours) = self.quiet_hours {
            settings.quiet_hours = quiet_hours;
        }
        if let Some(sync) = self.google_calendar_sync {
            settings.google_calendar_sync = sync;
        }
    }
}

/// One user's complete stored state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDocument {
    pub user_id: String,
    pub profile: Profile,
    pub settings: Settings,
    pub weeks: BTreeMap<String, WeekRecord>,
    pub journal: BTreeMap<String, JournalEntry>,
}

impl UserDocument {
    /// Fresh document for a first sign-in.
    pub fn new(user_id: &str, seed: ProfileSeed) -> Self {
        Self {
            user_id: user_id.to_string(),
            profile: Profile {
                name: seed.name,
                email: seed.email,
                photo_url: seed.photo_url,
                created_at: chrono::Utc::now().to_rfc3339(),
            },
            settings: Settings::default(),
            weeks: BTreeMap::new(),
            journal: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_all_nine_reminders() {
        let doc = UserDocument::new("u1", ProfileSeed::default());
        assert_eq!(doc.user_id, "u1");
        assert_eq!(doc.settings.reminders.len(), 9);
        assert_eq!(doc.settings.quiet_hours.start, "22:00");
        assert_eq!(doc.settings.quiet_hours.end, "07:00");
        assert!(doc.weeks.is_empty());
        assert!(doc.journal.is_empty());

        let bedtime = &doc.settings.reminders[&Rule::Bedtime];
        assert!(bedtime.enabled);
        assert_eq!(bedtime.offset_minutes, Some(30));

        let batch = &doc.settings.reminders[&Rule::BatchTasks];
        assert!(!batch.enabled);
        assert_eq!(batch.time, None);
    }

    #[test]
    fn settings_patch_is_shallow() {
        let mut settings = Settings::default();
        let patch = SettingsPatch {
            quiet_hours: Some(QuietHours {
                start: "23:00".to_string(),
                end: "06:00".to_string(),
            }),
            ..Default::default()
        };
        patch.apply(&mut settings);

        assert_eq!(settings.quiet_hours.start, "23:00");
        // Untouched fields keep their values.
        assert_eq!(settings.reminders.len(), 9);
        assert!(!settings.google_calendar_sync);
    }

    #[test]
    fn document_serializes_camel_case() {
        let doc = UserDocument::new("u1", ProfileSeed::default());
        let json = serde_json::to_value(&doc).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("userId"));
        assert!(obj.contains_key("profile"));
        assert!(obj.contains_key("settings"));
        assert!(json["settings"]
            .as_object()
            .unwrap()
            .contains_key("quietHours"));
        assert!(json["settings"]["reminders"]
            .as_object()
            .unwrap()
            .contains_key("moveBy3pm"));
        assert!(json["profile"].as_object().unwrap().contains_key("photoURL"));
    }

    #[test]
    fn reminder_map_round_trips() {
        let doc = UserDocument::new("u1", ProfileSeed::default());
        let json = serde_json::to_string(&doc).unwrap();
        let back: UserDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
