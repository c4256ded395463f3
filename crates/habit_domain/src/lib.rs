pub mod day;
pub mod grid;
pub mod habit;
pub mod notifications;
pub mod store;
pub mod streak;
pub mod vault;

pub use crate::store::{HabitStore, HabitStoreBuilder, StoreError};
