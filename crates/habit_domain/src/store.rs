use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::day::CalendarDay;
use crate::habit::{CompletionLog, Habit, HabitId};
use crate::vault::{HabitVault, MemoryVault};

/// The single vault key under which the whole collection is persisted.
pub const SAVE_KEY: &str = "saved_habits";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode habit collection")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write habit collection to the vault")]
    Save(#[source] anyhow::Error),
}

/// Owner of the habit collection and sole mutation gateway. Every mutating
/// operation rewrites the full collection through the vault before
/// returning; reads hand out clones. The `RwLock` serializes the
/// read-modify-persist sequence when the store is shared across threads.
pub struct HabitStore {
    habits: RwLock<Vec<Habit>>,
    vault: Box<dyn HabitVault>,
}

pub struct HabitStoreBuilder {
    vault: Option<Box<dyn HabitVault>>,
    seed_on_empty: bool,
    seed_today: Option<CalendarDay>,
}

impl HabitStoreBuilder {
    pub fn new() -> Self {
        Self {
            vault: None,
            seed_on_empty: true,
            seed_today: None,
        }
    }

    pub fn with_vault(mut self, vault: Box<dyn HabitVault>) -> Self {
        self.vault = Some(vault);
        self
    }

    pub fn seed_on_empty(mut self, seed: bool) -> Self {
        self.seed_on_empty = seed;
        self
    }

    /// Fixes the day the seeder treats as "today"; defaults to the local
    /// calendar date at build time.
    pub fn seed_today(mut self, today: CalendarDay) -> Self {
        self.seed_today = Some(today);
        self
    }

    pub fn build(self) -> Result<HabitStore, StoreError> {
        let vault = self
            .vault
            .unwrap_or_else(|| Box::new(MemoryVault::new()));
        let habits = load_collection(vault.as_ref());
        let store = HabitStore {
            habits: RwLock::new(habits),
            vault,
        };

        if self.seed_on_empty {
            let mut habits = store.habits.write();
            if habits.is_empty() {
                let today = self.seed_today.unwrap_or_else(CalendarDay::today);
                *habits = sample_habits(today);
                store.persist(&habits)?;
                debug!(count = habits.len(), "seeded empty store with sample habits");
            }
        }

        Ok(store)
    }
}

impl HabitStore {
    pub fn builder() -> HabitStoreBuilder {
        HabitStoreBuilder::new()
    }

    pub fn add(&self, habit: Habit) -> Result<(), StoreError> {
        let mut habits = self.habits.write();
        habits.push(habit);
        self.persist(&habits)
    }

    /// Replaces the habit with a matching id. A missing id is a no-op and
    /// does not touch the vault.
    pub fn update(&self, habit: Habit) -> Result<(), StoreError> {
        let mut habits = self.habits.write();
        let Some(slot) = habits.iter_mut().find(|entry| entry.id == habit.id) else {
            return Ok(());
        };
        *slot = habit;
        self.persist(&habits)
    }

    pub fn delete(&self, id: HabitId) -> Result<(), StoreError> {
        let mut habits = self.habits.write();
        habits.retain(|entry| entry.id != id);
        self.persist(&habits)
    }

    #[instrument(skip(self))]
    pub fn toggle_completion(&self, id: HabitId, day: CalendarDay) -> Result<(), StoreError> {
        let mut habits = self.habits.write();
        let Some(habit) = habits.iter_mut().find(|entry| entry.id == id) else {
            return Ok(());
        };
        habit.toggle_completion(day);
        self.persist(&habits)
    }

    pub fn get(&self, id: HabitId) -> Option<Habit> {
        self.habits
            .read()
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    pub fn active(&self) -> Vec<Habit> {
        self.habits
            .read()
            .iter()
            .filter(|entry| !entry.is_archived)
            .cloned()
            .collect()
    }

    pub fn archived(&self) -> Vec<Habit> {
        self.habits
            .read()
            .iter()
            .filter(|entry| entry.is_archived)
            .cloned()
            .collect()
    }

    fn persist(&self, habits: &[Habit]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(habits).map_err(StoreError::Encode)?;
        self.vault
            .save(SAVE_KEY, &bytes)
            .map_err(StoreError::Save)?;
        debug!(count = habits.len(), "persisted habit collection");
        Ok(())
    }
}

/// A missing or malformed blob falls back to an empty collection. The
/// failure is logged rather than surfaced; the seeder takes over from there.
fn load_collection(vault: &dyn HabitVault) -> Vec<Habit> {
    let bytes = match vault.load(SAVE_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(error) => {
            warn!(%error, "vault read failed, starting with an empty collection");
            return Vec::new();
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(habits) => habits,
        Err(error) => {
            warn!(%error, "stored habit collection is malformed, starting empty");
            Vec::new()
        }
    }
}

enum SeedPattern {
    Regular,
    Sparse,
}

fn sample_habits(today: CalendarDay) -> Vec<Habit> {
    let mut gym = Habit::new("Gym", "No Description", "dumbbell", "purple", today);
    gym.completions = seed_completions(SeedPattern::Regular, today);

    let mut reading = Habit::new(
        "Evening Reading",
        "Twenty minutes before bed",
        "book",
        "teal",
        today,
    );
    reading.completions = seed_completions(SeedPattern::Sparse, today);

    vec![gym, reading]
}

fn seed_completions(pattern: SeedPattern, today: CalendarDay) -> CompletionLog {
    let days = (0i64..120)
        .filter(|days_ago| match pattern {
            SeedPattern::Regular => days_ago % 7 < 5,
            SeedPattern::Sparse => days_ago % 5 == 0 || days_ago % 7 == 3,
        })
        .map(|days_ago| today.add_days(-days_ago))
        .collect();
    CompletionLog::from_days(days)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use anyhow::{anyhow, Result};

    fn day(year: i32, month: u32, day: u32) -> CalendarDay {
        CalendarDay::from_ymd(year, month, day).unwrap()
    }

    fn today() -> CalendarDay {
        day(2025, 10, 20)
    }

    fn empty_store(vault: Arc<MemoryVault>) -> HabitStore {
        HabitStore::builder()
            .with_vault(Box::new(vault))
            .seed_on_empty(false)
            .build()
            .expect("build store")
    }

    struct FailingVault;

    impl HabitVault for FailingVault {
        fn load(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn save(&self, _key: &str, _bytes: &[u8]) -> Result<()> {
            Err(anyhow!("vault unavailable"))
        }
    }

    #[test]
    fn seeds_and_persists_when_the_vault_is_empty() {
        let vault = Arc::new(MemoryVault::new());
        let store = HabitStore::builder()
            .with_vault(Box::new(vault.clone()))
            .seed_today(today())
            .build()
            .expect("build store");

        let active = store.active();
        assert!(!active.is_empty());
        assert!(active.iter().all(|habit| !habit.completions.is_empty()));
        assert!(
            vault.load(SAVE_KEY).unwrap().is_some(),
            "seed must be written through"
        );

        // The regular pattern includes today, so the seeded streak is live.
        assert!(active
            .iter()
            .any(|habit| habit.current_streak(today()) > 0));
    }

    #[test]
    fn seeding_is_a_one_time_bootstrap() {
        let vault = Arc::new(MemoryVault::new());
        let first = HabitStore::builder()
            .with_vault(Box::new(vault.clone()))
            .seed_today(today())
            .build()
            .expect("first build");
        let seeded = first.active();

        let second = HabitStore::builder()
            .with_vault(Box::new(vault))
            .seed_today(today().succ())
            .build()
            .expect("second build");
        assert_eq!(second.active(), seeded);
    }

    #[test]
    fn malformed_blob_falls_back_to_empty_then_seeds() {
        let vault = Arc::new(MemoryVault::preloaded(SAVE_KEY, b"not json".to_vec()));
        let store = HabitStore::builder()
            .with_vault(Box::new(vault.clone()))
            .seed_today(today())
            .build()
            .expect("build store");

        assert!(!store.active().is_empty());
        let bytes = vault.load(SAVE_KEY).unwrap().expect("reseeded blob");
        let decoded: Vec<Habit> = serde_json::from_slice(&bytes).expect("valid json");
        assert_eq!(decoded.len(), store.active().len());
    }

    #[test]
    fn add_persists_the_new_habit() {
        let vault = Arc::new(MemoryVault::new());
        let store = empty_store(vault.clone());

        let habit = Habit::new("Stretch", "", "figure.walk", "teal", today());
        let id = habit.id;
        store.add(habit).expect("add");

        let reloaded = empty_store(vault);
        assert_eq!(reloaded.get(id).expect("survives reload").name, "Stretch");
    }

    #[test]
    fn update_replaces_matching_habit() {
        let vault = Arc::new(MemoryVault::new());
        let store = empty_store(vault);

        let mut habit = Habit::new("Run", "", "figure.run", "red", today());
        let id = habit.id;
        store.add(habit.clone()).expect("add");

        habit.name = "Morning Run".to_string();
        habit.streak_goal = Some(14);
        store.update(habit).expect("update");

        let updated = store.get(id).expect("still present");
        assert_eq!(updated.name, "Morning Run");
        assert_eq!(updated.streak_goal, Some(14));
    }

    #[test]
    fn update_with_unknown_id_is_a_no_op() {
        let vault = Arc::new(MemoryVault::new());
        let store = empty_store(vault.clone());
        store
            .add(Habit::new("Run", "", "figure.run", "red", today()))
            .expect("add");
        let before = vault.load(SAVE_KEY).unwrap();

        let stranger = Habit::new("Ghost", "", "moon", "gray", today());
        store.update(stranger).expect("no-op update");

        assert_eq!(store.active().len(), 1);
        assert_eq!(vault.load(SAVE_KEY).unwrap(), before, "vault untouched");
    }

    #[test]
    fn delete_removes_and_persists() {
        let vault = Arc::new(MemoryVault::new());
        let store = empty_store(vault.clone());

        let habit = Habit::new("Run", "", "figure.run", "red", today());
        let id = habit.id;
        store.add(habit).expect("add");
        store.delete(id).expect("delete");

        assert!(store.get(id).is_none());
        let reloaded = empty_store(vault);
        assert!(reloaded.active().is_empty());
    }

    #[test]
    fn toggle_completion_round_trips_through_the_vault() {
        let vault = Arc::new(MemoryVault::new());
        let store = empty_store(vault.clone());

        let habit = Habit::new("Meditate", "", "brain", "blue", today());
        let id = habit.id;
        store.add(habit).expect("add");
        store.toggle_completion(id, today()).expect("toggle");

        let reloaded = empty_store(vault);
        let habit = reloaded.get(id).expect("reloaded habit");
        assert!(habit.is_completed_on(today()));
        assert_eq!(habit.current_streak(today()), 1);

        store.toggle_completion(id, today()).expect("toggle back");
        assert!(!store.get(id).unwrap().is_completed_on(today()));
    }

    #[test]
    fn toggle_completion_with_unknown_id_is_a_no_op() {
        let store = empty_store(Arc::new(MemoryVault::new()));
        store
            .toggle_completion(HabitId::new_v4(), today())
            .expect("no-op toggle");
        assert!(store.active().is_empty());
    }

    #[test]
    fn active_and_archived_split_by_flag() {
        let store = empty_store(Arc::new(MemoryVault::new()));

        let keep = Habit::new("Keep", "", "star", "yellow", today());
        let mut shelve = Habit::new("Shelve", "", "box", "gray", today());
        shelve.is_archived = true;
        let shelved_id = shelve.id;

        store.add(keep).expect("add");
        store.add(shelve).expect("add");

        assert_eq!(store.active().len(), 1);
        assert_eq!(store.archived().len(), 1);
        assert_eq!(store.archived()[0].id, shelved_id);
    }

    #[test]
    fn failed_save_is_surfaced_but_memory_keeps_the_mutation() {
        let store = HabitStore::builder()
            .with_vault(Box::new(FailingVault))
            .seed_on_empty(false)
            .build()
            .expect("build store");

        let habit = Habit::new("Run", "", "figure.run", "red", today());
        let result = store.add(habit);
        assert!(matches!(result, Err(StoreError::Save(_))));
        assert_eq!(store.active().len(), 1);
    }

    #[test]
    fn seeding_against_a_failing_vault_surfaces_the_error() {
        let result = HabitStore::builder()
            .with_vault(Box::new(FailingVault))
            .seed_today(today())
            .build();
        assert!(matches!(result, Err(StoreError::Save(_))));
    }
}
