//! Week mutation API.
//!
//! `WeekSession` wraps one user's record for one ISO week. Every operation
//! is a read-modify-write against the in-memory record: clone, apply the
//! edit, persist the whole record through the document service, and only
//! then swap the in-memory copy. A failed save leaves the session (and
//! whatever the caller is rendering from it) at the pre-mutation state.
//!
//! Operations require a signed-in user and an already-loaded week; without
//! either they return false and change nothing. Edits that target an
//! unknown habit/task/event id are silent no-ops that still persist.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::documents::{DocumentService, NewTimerLog};
use crate::models::week::{
    AdventureKind, BedtimeLog, Day, DayStatus, Habit, MovementLog, PlanSection, PlannerEvent,
    Task, TaskStatus, TimerLog, WeekRecord,
};
use crate::utils::dates::week_key;
use crate::utils::ids::new_id;

/// Shallow update of a Friday-plan task; provided fields replace the
/// existing values.
#[derive(Clone, Debug, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub status: Option<TaskStatus>,
    pub planned_minutes: Option<u32>,
    pub actual_minutes: Option<u32>,
}

/// A planner event about to be created; id and creation time are assigned
/// by the session.
#[derive(Clone, Debug, Default)]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub time: Option<String>,
    pub category: String,
    pub notes: String,
}

/// Shallow update of a planner event. `time` is doubly optional so it can
/// be cleared.
#[derive(Clone, Debug, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<Option<String>>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

pub struct WeekSession {
    docs: Arc<DocumentService>,
    user_id: Option<String>,
    week_key: String,
    week: Option<WeekRecord>,
}

impl WeekSession {
    /// Open the session for the week containing `date`, reading the record
    /// from the local cache. With no signed-in user the session stays
    /// unloaded and every mutation fails.
    pub fn open(docs: Arc<DocumentService>, user_id: Option<&str>, date: NaiveDate) -> Self {
        let key = week_key(date);
        let week = user_id.and_then(|user| docs.week(user, &key));
        Self {
            docs,
            user_id: user_id.map(str::to_string),
            week_key: key,
            week,
        }
    }

    pub fn week_key(&self) -> &str {
        &self.week_key
    }

    pub fn week(&self) -> Option<&WeekRecord> {
        self.week.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.week.is_some()
    }

    /// Persist a fully rebuilt record.
    pub fn save(&mut self, week: WeekRecord) -> bool {
        if self.week.is_none() {
            return false;
        }
        self.commit(week)
    }

    fn commit(&mut self, week: WeekRecord) -> bool {
        let Some(user_id) = &self.user_id else {
            return false;
        };
        if self.docs.save_week(user_id, &self.week_key, week.clone()) {
            self.week = Some(week);
            true
        } else {
            false
        }
    }

    fn mutate(&mut self, edit: impl FnOnce(&mut WeekRecord)) -> bool {
        if self.user_id.is_none() {
            return false;
        }
        let Some(current) = &self.week else {
            return false;
        };
        // Full clone: the persisted record must never alias the one the
        // caller is still rendering from.
        let mut next = current.clone();
        edit(&mut next);
        self.commit(next)
    }

    // ----- bedtime -----

    pub fn log_bedtime(&mut self, day: Day, hit: bool, actual: Option<&str>) -> bool {
        self.mutate(|week| {
            week.bedtime.logs.insert(
                day,
                BedtimeLog {
                    hit,
                    actual: actual.map(str::to_string),
                },
            );
        })
    }

    pub fn set_bedtime_target(&mut self, target: &str) -> bool {
        self.mutate(|week| week.bedtime.target = target.to_string())
    }

    // ----- friday plan -----

    pub fn mark_friday_plan_done(&mut self, done: bool) -> bool {
        self.mutate(|week| week.friday_plan.done = done)
    }

    pub fn set_section_notes(&mut self, section: PlanSection, notes: &str) -> bool {
        self.mutate(|week| week.friday_plan.section_mut(section).notes = notes.to_string())
    }

    pub fn add_task(&mut self, name: &str, section: PlanSection) -> bool {
        self.mutate(|week| {
            week.friday_plan.section_mut(section).tasks.push(Task {
                id: new_id(),
                name: name.to_string(),
                status: TaskStatus::NotStarted,
                planned_minutes: None,
                actual_minutes: None,
            });
        })
    }

    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch, section: PlanSection) -> bool {
        self.mutate(|week| {
            let tasks = &mut week.friday_plan.section_mut(section).tasks;
            if let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) {
                if let Some(name) = patch.name {
                    task.name = name;
                }
                if let Some(status) = patch.status {
                    task.status = status;
                }
                if let Some(planned) = patch.planned_minutes {
                    task.planned_minutes = Some(planned);
                }
                if let Some(actual) = patch.actual_minutes {
                    task.actual_minutes = Some(actual);
                }
            }
        })
    }

    pub fn remove_task(&mut self, task_id: &str, section: PlanSection) -> bool {
        self.mutate(|week| {
            week.friday_plan
                .section_mut(section)
                .tasks
                .retain(|t| t.id != task_id);
        })
    }

    // ----- movement -----

    pub fn log_movement(&mut self, day: Day, moved: bool, activity: Option<&str>) -> bool {
        self.mutate(|week| {
            week.move_by3pm.insert(
                day,
                MovementLog {
                    moved,
                    activity: activity.map(str::to_string),
                },
            );
        })
    }

    // ----- habits -----

    pub fn add_habit(&mut self, name: &str) -> bool {
        self.mutate(|week| {
            week.habits.push(Habit {
                id: new_id(),
                name: name.to_string(),
                days: Default::default(),
            });
        })
    }

    pub fn remove_habit(&mut self, habit_id: &str) -> bool {
        self.mutate(|week| week.habits.retain(|h| h.id != habit_id))
    }

    pub fn log_habit_day(&mut self, habit_id: &str, day: Day, done: bool) -> bool {
        self.mutate(|week| {
            if let Some(habit) = week.habits.iter_mut().find(|h| h.id == habit_id) {
                habit.days.insert(day, done);
            }
        })
    }

    // ----- backup slot -----

    pub fn set_backup_slot(&mut self, slot: &str) -> bool {
        self.mutate(|week| week.backup_slot.slot = slot.to_string())
    }

    pub fn mark_backup_used(&mut self, used: bool, note: &str) -> bool {
        self.mutate(|week| {
            week.backup_slot.used = Some(used);
            week.backup_slot.note = note.to_string();
        })
    }

    // ----- adventures -----

    pub fn set_adventure(&mut self, kind: AdventureKind, description: &str) -> bool {
        self.mutate(|week| {
            let adventure = match kind {
                AdventureKind::Big => &mut week.adventures.big,
                AdventureKind::Little => &mut week.adventures.little,
            };
            adventure.description = description.to_string();
        })
    }

    pub fn complete_adventure(&mut self, kind: AdventureKind, completed: bool) -> bool {
        self.mutate(|week| {
            let adventure = match kind {
                AdventureKind::Big => &mut week.adventures.big,
                AdventureKind::Little => &mut week.adventures.little,
            };
            adventure.completed = completed;
        })
    }

    // ----- night for you -----

    pub fn set_night_for_you(&mut self, night: Option<Day>, activity: &str) -> bool {
        self.mutate(|week| {
            week.night_for_you.night = night;
            week.night_for_you.activity = activity.to_string();
        })
    }

    pub fn mark_night_taken(&mut self, took: bool) -> bool {
        self.mutate(|week| week.night_for_you.took = took)
    }

    // ----- batch tasks -----

    pub fn add_batch_task(&mut self, task: &str) -> bool {
        self.mutate(|week| week.batch_tasks.tasks.push(task.to_string()))
    }

    /// Toggle completion, matching the task by string value.
    pub fn toggle_batch_task(&mut self, task: &str) -> bool {
        self.mutate(|week| {
            if week.batch_tasks.is_completed(task) {
                week.batch_tasks.completed.retain(|t| t != task);
            } else {
                week.batch_tasks.completed.push(task.to_string());
            }
        })
    }

    pub fn remove_batch_task(&mut self, task: &str) -> bool {
        self.mutate(|week| {
            week.batch_tasks.tasks.retain(|t| t != task);
            week.batch_tasks.completed.retain(|t| t != task);
        })
    }

    // ----- effortful first -----

    pub fn set_effortful_activity(&mut self, activity: &str) -> bool {
        self.mutate(|week| week.effortful_first.activity = activity.to_string())
    }

    pub fn log_effortful_day(&mut self, day: Day, done: bool) -> bool {
        self.mutate(|week| {
            week.effortful_first.days.insert(day, done);
        })
    }

    // ----- timer logs -----

    pub fn add_timer_log(&mut self, log: NewTimerLog) -> bool {
        self.mutate(|week| {
            week.timer_logs.push(TimerLog {
                id: new_id(),
                activity: log.activity,
                minutes: log.minutes,
                date: log.date,
                mode: log.mode,
                tag: log.tag,
                timestamp: chrono::Utc::now().to_rfc3339(),
            });
        })
    }

    pub fn remove_timer_log(&mut self, log_id: &str) -> bool {
        self.mutate(|week| week.timer_logs.retain(|log| log.id != log_id))
    }

    // ----- planner events -----

    pub fn add_event(&mut self, event: NewEvent) -> bool {
        self.mutate(|week| {
            week.events.push(PlannerEvent {
                id: new_id(),
                title: event.title,
                date: event.date,
                time: event.time,
                category: event.category,
                notes: event.notes,
                completed: false,
                created_at: chrono::Utc::now().to_rfc3339(),
            });
        })
    }

    pub fn update_event(&mut self, event_id: &str, patch: EventPatch) -> bool {
        self.mutate(|week| {
            if let Some(event) = week.events.iter_mut().find(|e| e.id == event_id) {
                if let Some(title) = patch.title {
                    event.title = title;
                }
                if let Some(date) = patch.date {
                    event.date = date;
                }
                if let Some(time) = patch.time {
                    event.time = time;
                }
                if let Some(category) = patch.category {
                    event.category = category;
                }
                if let Some(notes) = patch.notes {
                    event.notes = notes;
                }
                if let Some(completed) = patch.completed {
                    event.completed = completed;
                }
            }
        })
    }

    pub fn remove_event(&mut self, event_id: &str) -> bool {
        self.mutate(|week| week.events.retain(|e| e.id != event_id))
    }

    // ----- derived -----

    /// Today's snapshot (movement, bedtime, effortful) in local time.
    pub fn today_status(&self) -> DayStatus {
        let today = Day::from_date(Local::now().date_naive());
        self.week
            .as_ref()
            .map(|week| week.day_status(today))
            .unwrap_or_default()
    }
}
