use uuid::Uuid;

use crate::habit::{Habit, Reminder};

/// Platform-specific reminder schedulers will implement this trait. The core
/// stores reminder records but never invokes scheduling itself; that is the
/// embedding application's job.
pub trait ReminderScheduler: Send + Sync {
    fn schedule(&self, habit_name: &str, reminder: &Reminder);
    fn cancel(&self, reminder_id: Uuid);
    fn cancel_all(&self, reminder_ids: &[Uuid]);
}

/// Ids of every reminder attached to `habit`, for bulk cancellation.
pub fn reminder_ids(habit: &Habit) -> Vec<Uuid> {
    habit.reminders.iter().map(|reminder| reminder.id).collect()
}
