use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;

use crate::tui::app::App;
use crate::util::unicode;

/// Whether `habit_id` is done on `date`. A failed read shows as not done.
pub(super) fn is_done(app: &App, habit_id: &str, date: NaiveDate) -> bool {
    app.store
        .is_completed(habit_id, date)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, habit = habit_id, %date, "could not read completion");
            false
        })
}

/// How many active habits are done on `date`
pub(super) fn done_count(app: &App, date: NaiveDate) -> usize {
    app.session
        .habits
        .iter()
        .filter(|h| is_done(app, &h.id, date))
        .count()
}

/// Three-dot progress gauge for `done` out of `total`. Blank with no habits.
pub(super) fn progress_dots(done: usize, total: usize) -> &'static str {
    if total == 0 {
        return "   ";
    }
    if done >= total {
        return "\u{25CF}\u{25CF}\u{25CF}";
    }
    // Thresholds in percent, integer math
    let pct = done * 100 / total;
    if pct >= 66 {
        "\u{25CF}\u{25CF}\u{25CB}"
    } else if pct >= 33 {
        "\u{25CF}\u{25CB}\u{25CB}"
    } else if done > 0 {
        "\u{25D0}\u{25CB}\u{25CB}"
    } else {
        "\u{25CB}\u{25CB}\u{25CB}"
    }
}

/// ✓ or ○
pub(super) fn check_mark(done: bool) -> &'static str {
    if done { "\u{2713}" } else { "\u{25CB}" }
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad a line out to `width` so a cursor background spans the whole row
pub(super) fn pad_line(spans: &mut Vec<Span<'_>>, width: usize, style: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
