use crate::day::CalendarDay;
use crate::habit::CompletionLog;

/// Length of the consecutive-day run ending at `today`. A log without a
/// completion on `today` yields 0 no matter how long the historical run is;
/// callers wanting a grace window express it through the `today` they pass.
pub fn current_streak(completions: &CompletionLog, today: CalendarDay) -> u32 {
    let mut cursor = today;
    let mut streak = 0;

    for entry in completions.days_desc() {
        if entry == cursor {
            streak += 1;
            cursor = cursor.pred();
        } else if entry < cursor {
            break;
        }
        // Entries after the cursor are stale duplicates; skip them.
    }

    streak
}
