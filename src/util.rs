/// Seconds as `m:ss`, the way the header shows the remaining time
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Share of correct answers, rounded to a whole percent
pub fn percent(correct: u32, total: u32) -> Option<u32> {
    match total {
        0 => None,
        total => Some(((correct as f64 / total as f64) * 100.0).round() as u32),
    }
}
