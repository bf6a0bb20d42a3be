//! The weekly rule-tracking record and its nested structures.
//!
//! One `WeekRecord` holds everything the user logged against the nine
//! rules for a single ISO week, plus timer logs and planner events. The
//! serialized form is camelCase JSON so documents match the stored shape
//! exactly.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Day-of-week key used in the per-day log maps ("Mon".."Sun").
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    pub fn from_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Mon,
            Weekday::Tue => Day::Tue,
            Weekday::Wed => Day::Wed,
            Weekday::Thu => Day::Thu,
            Weekday::Fri => Day::Fri,
            Weekday::Sat => Day::Sat,
            Weekday::Sun => Day::Sun,
        }
    }
}

/// The nine behavioral rules tracked per week.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    Bedtime,
    PlanFridays,
    MoveBy3pm,
    Habits,
    BackupSlot,
    Adventures,
    NightForYou,
    BatchTasks,
    EffortfulFirst,
}

impl Rule {
    pub const ALL: [Rule; 9] = [
        Rule::Bedtime,
        Rule::PlanFridays,
        Rule::MoveBy3pm,
        Rule::Habits,
        Rule::BackupSlot,
        Rule::Adventures,
        Rule::NightForYou,
        Rule::BatchTasks,
        Rule::EffortfulFirst,
    ];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedtimeLog {
    pub hit: bool,
    pub actual: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bedtime {
    pub target: String,
    pub logs: BTreeMap<Day, BedtimeLog>,
}

impl Default for Bedtime {
    fn default() -> Self {
        Self {
            target: "22:30".to_string(),
            logs: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
    RolledOver,
}

/// A task inside a Friday-plan section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_minutes: Option<u32>,
}

/// The three Friday-plan sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanSection {
    Career,
    Relationships,
    #[serde(rename = "self")]
    SelfCare,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionPlan {
    pub notes: String,
    pub tasks: Vec<Task>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FridayPlan {
    pub done: bool,
    pub career: SectionPlan,
    pub relationships: SectionPlan,
    #[serde(rename = "self")]
    pub self_care: SectionPlan,
}

impl FridayPlan {
    pub fn section(&self, section: PlanSection) -> &SectionPlan {
        match section {
            PlanSection::Career => &self.career,
            PlanSection::Relationships => &self.relationships,
            PlanSection::SelfCare => &self.self_care,
        }
    }

    pub fn section_mut(&mut self, section: PlanSection) -> &mut SectionPlan {
        match section {
            PlanSection::Career => &mut self.career,
            PlanSection::Relationships => &mut self.relationships,
            PlanSection::SelfCare => &mut self.self_care,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementLog {
    pub moved: bool,
    pub activity: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub days: BTreeMap<Day, bool>,
}

impl Habit {
    pub fn days_hit(&self) -> usize {
        self.days.values().filter(|done| **done).count()
    }

    /// A habit counts as established once it was done on 3 or more days.
    pub fn is_established(&self) -> bool {
        self.days_hit() >= 3
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupSlot {
    pub slot: String,
    /// `None` until the user records whether the slot was actually needed.
    pub used: Option<bool>,
    pub note: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Adventure {
    pub description: String,
    pub completed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Adventures {
    pub big: Adventure,
    pub little: Adventure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdventureKind {
    Big,
    Little,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NightForYou {
    /// The chosen evening, serialized as "" while unset.
    #[serde(with = "day_or_empty")]
    pub night: Option<Day>,
    pub activity: String,
    pub took: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchTasks {
    pub tasks: Vec<String>,
    /// Completion is tracked by task string value, not by id: two tasks
    /// with identical text are indistinguishable.
    pub completed: Vec<String>,
}

impl BatchTasks {
    pub fn is_completed(&self, task: &str) -> bool {
        self.completed.iter().any(|t| t == task)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffortfulFirst {
    pub activity: String,
    pub days: BTreeMap<Day, bool>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Simple,
    Pomodoro,
}

/// One confirmed timer session, appended to the week it was logged in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerLog {
    pub id: String,
    pub activity: String,
    pub minutes: u32,
    pub date: String,
    pub mode: TimerMode,
    #[serde(default)]
    pub tag: Option<String>,
    pub timestamp: String,
}

/// A weekly-planner event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerEvent {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub category: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
}

/// Full rule-tracking state for one ISO week.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeekRecord {
    pub bedtime: Bedtime,
    pub friday_plan: FridayPlan,
    pub move_by3pm: BTreeMap<Day, MovementLog>,
    pub habits: Vec<Habit>,
    pub backup_slot: BackupSlot,
    pub adventures: Adventures,
    pub night_for_you: NightForYou,
    pub batch_tasks: BatchTasks,
    pub effortful_first: EffortfulFirst,
    pub timer_logs: Vec<TimerLog>,
    pub events: Vec<PlannerEvent>,
}

/// Derived completion state of one rule, as shown on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleStatus {
    /// Nothing logged yet this week
    Empty,
    /// Configured but not yet resolved (e.g. a backup slot picked but not
    /// yet marked used/unused)
    Started,
    /// Partial progress, e.g. 3 of 7 days
    Count { done: u32, total: u32 },
    Complete,
}

impl WeekRecord {
    pub fn rule_status(&self, rule: Rule) -> RuleStatus {
        match rule {
            Rule::Bedtime => {
                let hits = self.bedtime.logs.values().filter(|l| l.hit).count() as u32;
                if hits > 0 {
                    RuleStatus::Count { done: hits, total: 7 }
                } else {
                    RuleStatus::Empty
                }
            }
            Rule::PlanFridays => {
                if self.friday_plan.done {
                    RuleStatus::Complete
                } else {
                    RuleStatus::Empty
                }
            }
            Rule::MoveBy3pm => {
                let moved = self.move_by3pm.values().filter(|m| m.moved).count() as u32;
                if moved > 0 {
                    RuleStatus::Count { done: moved, total: 7 }
                } else {
                    RuleStatus::Empty
                }
            }
            Rule::Habits => {
                if self.habits.is_empty() {
                    RuleStatus::Empty
                } else {
                    let established =
                        self.habits.iter().filter(|h| h.is_established()).count() as u32;
                    RuleStatus::Count {
                        done: established,
                        total: self.habits.len() as u32,
                    }
                }
            }
            Rule::BackupSlot => {
                if self.backup_slot.slot.is_empty() {
                    RuleStatus::Empty
                } else if self.backup_slot.used.is_some() {
                    RuleStatus::Complete
                } else {
                    RuleStatus::Started
                }
            }
            Rule::Adventures => {
                let done = u32::from(self.adventures.big.completed)
                    + u32::from(self.adventures.little.completed);
                if done > 0 {
                    RuleStatus::Count { done, total: 2 }
                } else {
                    RuleStatus::Empty
                }
            }
            Rule::NightForYou => {
                if self.night_for_you.took {
                    RuleStatus::Complete
                } else if self.night_for_you.night.is_some() {
                    RuleStatus::Started
                } else {
                    RuleStatus::Empty
                }
            }
            Rule::BatchTasks => {
                let total = self.batch_tasks.tasks.len() as u32;
                if total > 0 {
                    RuleStatus::Count {
                        done: self.batch_tasks.completed.len() as u32,
                        total,
                    }
                } else {
                    RuleStatus::Empty
                }
            }
            Rule::EffortfulFirst => {
                let done = self
                    .effortful_first
                    .days
                    .values()
                    .filter(|d| **d)
                    .count() as u32;
                if done > 0 {
                    RuleStatus::Count { done, total: 7 }
                } else {
                    RuleStatus::Empty
                }
            }
        }
    }

    /// Status of every rule, dashboard-style.
    pub fn status_summary(&self) -> BTreeMap<Rule, RuleStatus> {
        Rule::ALL
            .iter()
            .map(|rule| (*rule, self.rule_status(*rule)))
            .collect()
    }

    /// Quick per-day snapshot used by the dashboard header.
    pub fn day_status(&self, day: Day) -> DayStatus {
        DayStatus {
            moved: self.move_by3pm.get(&day).map(|m| m.moved).unwrap_or(false),
            bedtime_hit: self
                .bedtime
                .logs
                .get(&day)
                .map(|l| l.hit)
                .unwrap_or(false),
            effortful_done: self.effortful_first.days.get(&day).copied().unwrap_or(false),
        }
    }

    pub fn total_timer_minutes(&self) -> u32 {
        self.timer_logs.iter().map(|log| log.minutes).sum()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayStatus {
    pub moved: bool,
    pub bedtime_hit: bool,
    pub effortful_done: bool,
}

mod day_or_empty {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Day;

    pub fn serialize<S: Serializer>(value: &Option<Day>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(day) => serializer.serialize_str(day.as_str()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Day>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.as_str() {
            "Mon" => Ok(Some(Day::Mon)),
            "Tue" => Ok(Some(Day::Tue)),
            "Wed" => Ok(Some(Day::Wed)),
            "Thu" => Ok(Some(Day::Thu)),
            "Fri" => Ok(Some(Day::Fri)),
            "Sat" => Ok(Some(Day::Sat)),
            "Sun" => Ok(Some(Day::Sun)),
            other => Err(serde::de::Error::custom(format!(
                "unknown day name: {}",
                other
            ))),
        }
    }
}
