/// Clamps into `[0, 1]`; NaN counts as 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub fn format_degrees(radians: f64) -> String {
    format!("{:.1}°", radians.to_degrees())
}

/// Shortens a label to `max_chars` characters, marking the cut with an ellipsis.
pub fn short_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let keep = max_chars.saturating_sub(1);
    let mut shortened = text.chars().take(keep).collect::<String>();
    shortened.push('…');
    shortened
}
