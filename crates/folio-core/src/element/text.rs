//! Approximate text measurement.

use super::FontFamily;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// Measure text as `(width, height)` without a font engine.
///
/// Width is the widest line's character count times the font's average
/// glyph advance; height is one line-height per line, counting a trailing
/// newline as an extra (empty) line.
pub fn measure_text(text: &str, font_size: f64, font: FontFamily) -> (f64, f64) {
    let max_line_len = text
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let width = max_line_len as f64 * font_size * font.char_width_factor();

    let mut line_count = text.lines().count().max(1);
    if text.ends_with('\n') {
        line_count += 1;
    }
    let height = line_count as f64 * font_size * LINE_HEIGHT;

    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_one_line() {
        let (w, h) = measure_text("", 10.0, FontFamily::Monospace);
        assert!(w.abs() < f64::EPSILON);
        assert!((h - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_widest_line_wins() {
        let (w, h) = measure_text("ab\nabcd", 10.0, FontFamily::Monospace);
        assert!((w - 24.0).abs() < 1e-9);
        assert!((h - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_newline_adds_line() {
        let (_, h) = measure_text("abc\n", 10.0, FontFamily::Sans);
        assert!((h - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let (a, _) = measure_text("héé", 10.0, FontFamily::Monospace);
        let (b, _) = measure_text("hee", 10.0, FontFamily::Monospace);
        assert!((a - b).abs() < f64::EPSILON);
    }
}
