pub mod blob;
pub mod document;
pub mod journal;
pub mod week;

pub use document::{ProfileSeed, Settings, SettingsPatch, UserDocument};
pub use journal::{JournalEntry, JournalFilter, Mood};
pub use week::{Day, Rule, WeekRecord};
