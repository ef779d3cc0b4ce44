use crate::model::Constituent;

/// Greedily wraps `text` at spaces so no line exceeds `width` characters.
///
/// Existing line breaks are kept. A word longer than `width` is placed on a
/// line of its own rather than split. Runs of spaces collapse.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0;
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_len = word.chars().count();
            if line_len > 0 && line_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Formats a volume fraction as a percentage rounded to three decimals,
/// always with a fractional part (`34.0`, `6.22`).
#[must_use]
pub fn format_percent(fraction: f64) -> String {
    let pct = (fraction * 100.0 * 1000.0).round() / 1000.0;
    let text = pct.to_string();
    if text.contains('.') || !pct.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

/// Builds the wrapped `"material: pct%, ..."` summary of a composition.
///
/// Returns `None` for an empty composition.
#[must_use]
pub fn composition_summary(composition: &[Constituent], width: usize) -> Option<String> {
    if composition.is_empty() {
        return None;
    }
    let joined = composition
        .iter()
        .map(|c| format!("{}: {}%", c.material, format_percent(c.fraction)))
        .collect::<Vec<_>>()
        .join(", ");
    Some(wrap_text(&joined, width))
}
