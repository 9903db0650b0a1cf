/// Render `seconds` as `M:SS` (minutes unpadded).
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Render a track length, or a placeholder while it is still unknown.
pub fn format_duration_label(seconds: f64) -> String {
    if seconds > 0.0 {
        format_clock(seconds)
    } else {
        "Loading...".to_string()
    }
}
