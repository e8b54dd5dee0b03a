const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// Renders a minute count the way reports display wait times and estimates.
pub fn format_duration(minutes: u64) -> String {
    if minutes < MINUTES_PER_HOUR {
        return format!("{minutes} minutes");
    }

    if minutes < MINUTES_PER_DAY {
        let hours = minutes / MINUTES_PER_HOUR;
        let mins = minutes % MINUTES_PER_HOUR;
        if mins == 0 {
            return format!("{hours} hours");
        }
        return format!("{hours} hours, {mins} minutes");
    }

    let days = minutes / MINUTES_PER_DAY;
    let remainder = minutes % MINUTES_PER_DAY;
    let hours = remainder / MINUTES_PER_HOUR;
    let mins = remainder % MINUTES_PER_HOUR;

    let mut parts = vec![format!("{days} days")];
    if hours > 0 {
        parts.push(format!("{hours} hours"));
    }
    if mins > 0 {
        parts.push(format!("{mins} minutes"));
    }
    parts.join(", ")
}
