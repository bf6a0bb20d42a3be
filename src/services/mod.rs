//! Services Layer
//!
//! Business logic for the client-side core: document load/save/sync, the
//! week mutation API, the timer state machine and reminder planning.

pub mod documents;
pub mod reminders;
pub mod timer;
pub mod week;

pub use documents::{DocumentService, JournalSearchHit, NewTimerLog};
pub use timer::{CompletedSession, PomodoroConfig, PomodoroPhase, Tick, Timer};
pub use week::{EventPatch, NewEvent, TaskPatch, WeekSession};
