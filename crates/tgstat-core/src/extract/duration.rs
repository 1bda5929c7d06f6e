use std::sync::LazyLock;

use regex::Regex;

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:([0-9]+)\s*days?)?\s*(?:([0-9]+)\s*hours?)?\s*(?:([0-9]+)\s*min(?:ute)?s?)?\s*(?:([0-9]+)\s*sec(?:ond)?s?)?",
    )
    .expect("duration pattern is valid")
});

/// Parse `2days 03hours 15min 42sec` into seconds.
///
/// Every component is optional; absent ones count as zero, so an empty
/// string is `Some(0)`. Returns `None` for non-empty text where no
/// component matched at all.
pub fn parse_duration(text: &str) -> Option<u64> {
    let caps = DURATION.captures(text)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    let [days, hours, mins, secs] = [1, 2, 3, 4].map(part);

    if [days, hours, mins, secs].iter().all(Option::is_none) && !text.trim().is_empty() {
        return None;
    }

    let [days, hours, mins, secs] = [days, hours, mins, secs].map(|p| p.unwrap_or(0));
    Some(
        days.saturating_mul(86_400)
            .saturating_add(hours.saturating_mul(3_600))
            .saturating_add(mins.saturating_mul(60))
            .saturating_add(secs),
    )
}
