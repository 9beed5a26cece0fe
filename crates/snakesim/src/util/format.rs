use std::time::Duration;

/// Format a count with thousands separators (e.g. 1,234,567)
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a value already expressed in percent
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Format a duration with a unit suited to its size
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 1.0 {
        format!("{:.3} s", secs)
    } else if secs >= 1e-3 {
        format!("{:.3} ms", secs * 1e3)
    } else {
        format!("{} µs", duration.as_micros())
    }
}

/// Format a roll sequence as `3 -> 6 -> 1`
pub fn format_rolls(rolls: &[u32]) -> String {
    rolls
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
