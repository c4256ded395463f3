use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::day::CalendarDay;
use crate::streak;

/// Stable identifier for a habit, assigned at creation and never reused.
pub type HabitId = Uuid;

/// A recurring habit together with its completion history. Icon and color
/// are opaque identifiers resolved by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub category: Option<String>,
    pub streak_goal: Option<u32>,
    pub completions: CompletionLog,
    pub reminders: Vec<Reminder>,
    pub created_date: CalendarDay,
    pub is_archived: bool,
}

impl Habit {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        created_date: CalendarDay,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
            color: color.into(),
            category: None,
            streak_goal: None,
            completions: CompletionLog::default(),
            reminders: Vec::new(),
            created_date,
            is_archived: false,
        }
    }

    pub fn is_completed_on(&self, day: CalendarDay) -> bool {
        self.completions.is_completed(day)
    }

    pub fn toggle_completion(&mut self, day: CalendarDay) {
        self.completions.toggle(day);
    }

    pub fn current_streak(&self, today: CalendarDay) -> u32 {
        streak::current_streak(&self.completions, today)
    }

    pub fn streak_goal_met(&self, today: CalendarDay) -> bool {
        self.streak_goal
            .is_some_and(|goal| self.current_streak(today) >= goal)
    }
}

/// Reminder metadata carried for the notification-scheduling collaborator.
/// The core stores these records but never acts on them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub time: NaiveTime,
    pub is_enabled: bool,
    pub notification_id: Option<String>,
}

impl Reminder {
    pub fn new(time: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            time,
            is_enabled: true,
            notification_id: None,
        }
    }
}

/// The set of days a habit was marked done. Persisted as a plain array of
/// dates; day-identity and chronological order are the only semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CompletionLog {
    days: Vec<CalendarDay>,
}

impl CompletionLog {
    pub fn from_days(days: Vec<CalendarDay>) -> Self {
        let mut log = Self { days };
        log.days.sort_unstable_by(|a, b| b.cmp(a));
        log.days.dedup();
        log
    }

    pub fn is_completed(&self, day: CalendarDay) -> bool {
        self.days.contains(&day)
    }

    /// Removes an existing entry for `day`, otherwise inserts one. Calling
    /// twice with no mutation in between restores the prior membership.
    pub fn toggle(&mut self, day: CalendarDay) {
        if let Some(index) = self.days.iter().position(|entry| *entry == day) {
            self.days.remove(index);
        } else {
            self.days.push(day);
        }
        self.days.sort_unstable_by(|a, b| b.cmp(a));
    }

    /// All completed days, most recent first. Recomputed per call so the
    /// order holds even for logs deserialized from unsorted input.
    pub fn days_desc(&self) -> Vec<CalendarDay> {
        let mut days = self.days.clone();
        days.sort_unstable_by(|a, b| b.cmp(a));
        days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
