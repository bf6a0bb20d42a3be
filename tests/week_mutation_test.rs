//! Week mutation API tests over an in-memory document store: the generic
//! mutation contract (signed-in user, loaded week, clone-then-commit,
//! rollback on failed save) and the per-rule edit semantics.

use std::sync::Arc;

use chrono::NaiveDate;

use intentional_week::domain::{LocalCache, StorageError};
use intentional_week::infrastructure::MemoryCache;
use intentional_week::models::document::{ProfileSeed, UserDocument};
use intentional_week::models::week::{
    AdventureKind, Day, PlanSection, Rule, RuleStatus, TaskStatus, TimerMode, WeekRecord,
};
use intentional_week::services::week::{EventPatch, NewEvent, TaskPatch, WeekSession};
use intentional_week::services::{DocumentService, NewTimerLog};

fn service_with_user(user_id: &str) -> Arc<DocumentService> {
    let service = DocumentService::local_only(Arc::new(MemoryCache::new()));
    let document = UserDocument::new(user_id, ProfileSeed::default());
    assert!(service.save(user_id, &document));
    Arc::new(service)
}

fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 4).unwrap()
}

fn open(service: &Arc<DocumentService>, user: &str) -> WeekSession {
    WeekSession::open(Arc::clone(service), Some(user), wednesday())
}

#[test]
fn session_derives_week_key_from_date() {
    let service = service_with_user("u1");
    let session = open(&service, "u1");
    assert_eq!(session.week_key(), "2026-W06");
    assert!(session.is_loaded());
    assert_eq!(session.week(), Some(&WeekRecord::default()));
}

#[test]
fn mutations_fail_without_a_user() {
    let service = service_with_user("u1");
    let mut session = WeekSession::open(Arc::clone(&service), None, wednesday());
    assert!(!session.is_loaded());
    assert!(!session.log_bedtime(Day::Mon, true, Some("22:30")));
    assert!(!session.add_habit("Read"));
}

#[test]
fn mutations_fail_for_a_user_without_a_document() {
    let service = service_with_user("u1");
    let mut session = WeekSession::open(Arc::clone(&service), Some("stranger"), wednesday());
    assert!(!session.is_loaded());
    assert!(!session.mark_friday_plan_done(true));
}

#[test]
fn bedtime_log_touches_only_bedtime() {
    let service = service_with_user("u1");
    let mut session = open(&service, "u1");

    assert!(session.log_bedtime(Day::Mon, true, Some("22:30")));

    let week = session.week().unwrap();
    assert_eq!(week.bedtime.logs.len(), 1);
    let log = &week.bedtime.logs[&Day::Mon];
    assert!(log.hit);
    assert_eq!(log.actual.as_deref(), Some("22:30"));

    // Every other rule is still at its default value.
    let mut expected = WeekRecord::default();
    expected.bedtime.logs.insert(
        Day::Mon,
        intentional_week::models::week::BedtimeLog {
            hit: true,
            actual: Some("22:30".to_string()),
        },
    );
    assert_eq!(week, &expected);

    // And the persisted copy matches the in-memory one.
    assert_eq!(service.week("u1", "2026-W06").as_ref(), Some(week));
}

#[test]
fn bedtime_target_and_relog_overwrite() {
    let service = service_with_user("u1");
    let mut session = open(&service, "u1");

    assert!(session.set_bedtime_target("23:00"));
    assert!(session.log_bedtime(Day::Mon, false, None));
    assert!(session.log_bedtime(Day::Mon, true, Some("22:55")));

    let week = session.week().unwrap();
    assert_eq!(week.bedtime.target, "23:00");
    assert_eq!(week.bedtime.logs.len(), 1);
    assert!(week.bedtime.logs[&Day::Mon].hit);
}

#[test]
fn habit_lifecycle() {
    let service = service_with_user("u1");
    let mut session = open(&service, "u1");

    assert!(session.add_habit("Stretch"));
    assert!(session.add_habit("Stretch")); // duplicate names are allowed
    let ids: Vec<String> = session
        .week()
        .unwrap()
        .habits
        .iter()
        .map(|h| h.id.clone())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    assert!(session.log_habit_day(&ids[0], Day::Mon, true));
    assert!(session.log_habit_day(&ids[0], Day::Wed, true));
    assert!(session.log_habit_day(&ids[0], Day::Fri, true));

    let week = session.week().unwrap();
    assert!(week.habits[0].is_established());
    assert!(!week.habits[1].is_established());
    assert_eq!(
        week.rule_status(Rule::Habits),
        RuleStatus::Count { done: 1, total: 2 }
    );

    // Unknown habit id: silent no-op, operation still reports success.
    assert!(session.log_habit_day("missing", Day::Tue, true));
    assert_eq!(session.week().unwrap().habits[0].days.len(), 3);

    assert!(session.remove_habit(&ids[0]));
    assert_eq!(session.week().unwrap().habits.len(), 1);
}

#[test]
fn friday_plan_tasks_across_sections() {
    let service = service_with_user("u1");
    let mut session = open(&service, "u1");

    assert!(session.add_task("Ship report", PlanSection::Career));
    assert!(session.add_task("Call parents", PlanSection::Relationships));
    assert!(session.add_task("Long run", PlanSection::SelfCare));
    assert!(session.set_section_notes(PlanSection::Career, "big week"));

    let week = session.week().unwrap();
    assert_eq!(week.friday_plan.career.tasks.len(), 1);
    assert_eq!(week.friday_plan.relationships.tasks.len(), 1);
    assert_eq!(week.friday_plan.self_care.tasks.len(), 1);
    assert_eq!(week.friday_plan.career.notes, "big week");

    let task_id = week.friday_plan.career.tasks[0].id.clone();
    assert_eq!(
        week.friday_plan.career.tasks[0].status,
        TaskStatus::NotStarted
    );

    assert!(session.update_task(
        &task_id,
        TaskPatch {
            status: Some(TaskStatus::InProgress),
            planned_minutes: Some(90),
            ..Default::default()
        },
        PlanSection::Career,
    ));
    let task = &session.week().unwrap().friday_plan.career.tasks[0];
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.planned_minutes, Some(90));
    // Untouched fields survive the patch.
    assert_eq!(task.name, "Ship report");

    // Unknown id: no-op, still succeeds.
    assert!(session.update_task(
        "missing",
        TaskPatch {
            status: Some(TaskStatus::Done),
            ..Default::default()
        },
        PlanSection::Career,
    ));

    assert!(session.remove_task(&task_id, PlanSection::Career));
    assert!(session.week().unwrap().friday_plan.career.tasks.is_empty());

    assert!(session.mark_friday_plan_done(true));
    assert_eq!(
        session.week().unwrap().rule_status(Rule::PlanFridays),
        RuleStatus::Complete
    );
}

#[test]
fn movement_and_effortful_days() {
    let service = service_with_user("u1");
    let mut session = open(&service, "u1");

    assert!(session.log_movement(Day::Tue, true, Some("bike ride")));
    assert!(session.log_movement(Day::Wed, false, None));
    assert!(session.set_effortful_activity("Piano"));
    assert!(session.log_effortful_day(Day::Tue, true));

    let week = session.week().unwrap();
    assert_eq!(
        week.rule_status(Rule::MoveBy3pm),
        RuleStatus::Count { done: 1, total: 7 }
    );
    assert_eq!(week.effortful_first.activity, "Piano");
    assert_eq!(
        week.rule_status(Rule::EffortfulFirst),
        RuleStatus::Count { done: 1, total: 7 }
    );

    let status = week.day_status(Day::Tue);
    assert!(status.moved);
    assert!(status.effortful_done);
}

#[test]
fn backup_slot_adventures_and_night() {
    let service = service_with_user("u1");
    let mut session = open(&service, "u1");

    assert!(session.set_backup_slot("Sat morning"));
    assert_eq!(
        session.week().unwrap().rule_status(Rule::BackupSlot),
        RuleStatus::Started
    );
    assert!(session.mark_backup_used(true, "needed it for errands"));
    let week = session.week().unwrap();
    assert_eq!(week.backup_slot.used, Some(true));
    assert_eq!(week.rule_status(Rule::BackupSlot), RuleStatus::Complete);

    assert!(session.set_adventure(AdventureKind::Big, "Day hike"));
    assert!(session.set_adventure(AdventureKind::Little, "New coffee place"));
    assert!(session.complete_adventure(AdventureKind::Little, true));
    assert_eq!(
        session.week().unwrap().rule_status(Rule::Adventures),
        RuleStatus::Count { done: 1, total: 2 }
    );

    assert!(session.set_night_for_you(Some(Day::Thu), "pottery class"));
    assert_eq!(
        session.week().unwrap().rule_status(Rule::NightForYou),
        RuleStatus::Started
    );
    assert!(session.mark_night_taken(true));
    assert_eq!(
        session.week().unwrap().rule_status(Rule::NightForYou),
        RuleStatus::Complete
    );
}

#[test]
fn batch_tasks_complete_by_value() {
    let service = service_with_user("u1");
    let mut session = open(&service, "u1");

    assert!(session.add_batch_task("emails"));
    assert!(session.add_batch_task("emails")); // duplicate text
    assert!(session.add_batch_task("errands"));

    assert!(session.toggle_batch_task("emails"));
    let week = session.week().unwrap();
    // One completion entry marks *both* identical tasks done: completion
    // matches by string value, so duplicates are indistinguishable.
    assert_eq!(week.batch_tasks.completed, vec!["emails".to_string()]);
    assert!(week.batch_tasks.is_completed("emails"));
    assert_eq!(
        week.rule_status(Rule::BatchTasks),
        RuleStatus::Count { done: 1, total: 3 }
    );

    assert!(session.toggle_batch_task("emails"));
    assert!(session.week().unwrap().batch_tasks.completed.is_empty());

    assert!(session.toggle_batch_task("errands"));
    assert!(session.remove_batch_task("emails"));
    let week = session.week().unwrap();
    // Removal by value drops every copy.
    assert_eq!(week.batch_tasks.tasks, vec!["errands".to_string()]);
    assert_eq!(week.batch_tasks.completed, vec!["errands".to_string()]);
}

#[test]
fn timer_logs_append_only() {
    let service = service_with_user("u1");
    let mut session = open(&service, "u1");

    for minutes in [25, 25] {
        assert!(session.add_timer_log(NewTimerLog {
            activity: "Focus".to_string(),
            minutes,
            date: "2026-02-04".to_string(),
            mode: TimerMode::Pomodoro,
            tag: Some("work".to_string()),
        }));
    }

    let week = session.week().unwrap();
    assert_eq!(week.timer_logs.len(), 2);
    assert_ne!(week.timer_logs[0].id, week.timer_logs[1].id);
    assert_eq!(week.total_timer_minutes(), 50);

    let id = week.timer_logs[0].id.clone();
    assert!(session.remove_timer_log(&id));
    assert_eq!(session.week().unwrap().timer_logs.len(), 1);
}

#[test]
fn planner_events_crud() {
    let service = service_with_user("u1");
    let mut session = open(&service, "u1");

    assert!(session.add_event(NewEvent {
        title: "Dentist".to_string(),
        date: "2026-02-05".to_string(),
        time: Some("09:30".to_string()),
        category: "health".to_string(),
        notes: String::new(),
    }));

    let event = session.week().unwrap().events[0].clone();
    assert!(!event.id.is_empty());
    assert!(!event.created_at.is_empty());
    assert!(!event.completed);

    assert!(session.update_event(
        &event.id,
        EventPatch {
            completed: Some(true),
            time: Some(None), // clear the time
            ..Default::default()
        },
    ));
    let updated = &session.week().unwrap().events[0];
    assert!(updated.completed);
    assert_eq!(updated.time, None);
    assert_eq!(updated.title, "Dentist");

    // Unknown event id: silent no-op.
    assert!(session.update_event(
        "missing",
        EventPatch {
            title: Some("nope".to_string()),
            ..Default::default()
        },
    ));
    assert_eq!(session.week().unwrap().events.len(), 1);

    assert!(session.remove_event(&event.id));
    assert!(session.week().unwrap().events.is_empty());
}

#[test]
fn state_persists_across_sessions() {
    let service = service_with_user("u1");

    let mut first = open(&service, "u1");
    assert!(first.log_bedtime(Day::Fri, true, None));
    assert!(first.add_habit("Journal"));

    let second = open(&service, "u1");
    let week = second.week().unwrap();
    assert_eq!(week.bedtime.logs.len(), 1);
    assert_eq!(week.habits.len(), 1);
    assert_eq!(week.habits[0].name, "Journal");
}

/// Cache that accepts reads but refuses every write.
struct ReadOnlyCache {
    inner: MemoryCache,
}

impl LocalCache for ReadOnlyCache {
    fn get(&self, user_id: &str) -> Result<Option<UserDocument>, StorageError> {
        self.inner.get(user_id)
    }

    fn put(&self, _user_id: &str, _document: &UserDocument) -> Result<(), StorageError> {
        Err(StorageError::Io("storage quota exceeded".to_string()))
    }

    fn remove(&self, user_id: &str) -> Result<(), StorageError> {
        self.inner.remove(user_id)
    }
}

#[test]
fn failed_save_rolls_back_the_mutation() {
    let seed = MemoryCache::new();
    seed.put("u1", &UserDocument::new("u1", ProfileSeed::default()))
        .unwrap();
    let service = Arc::new(DocumentService::local_only(Arc::new(ReadOnlyCache {
        inner: seed,
    })));

    let mut session = WeekSession::open(Arc::clone(&service), Some("u1"), wednesday());
    assert!(session.is_loaded());

    // The write fails, so the caller sees false and the in-memory record
    // is untouched.
    assert!(!session.log_bedtime(Day::Mon, true, Some("22:30")));
    assert_eq!(session.week(), Some(&WeekRecord::default()));
}
