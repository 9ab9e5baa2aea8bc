//! Terminal rendering of the goal board

use goalboard_model::{Dashboard, GoalView, HexColor, DEFAULT_DARKEN};
use goalboard_model::view::{HOVER_DARKEN, TRACK_LIGHTEN};
use std::fmt::Write as _;

/// Cells in a progress bar
pub const BAR_WIDTH: usize = 20;

/// Text bar for a percentage
#[must_use]
pub fn bar(progress: u8) -> String {
    let filled = (usize::from(progress.min(100)) * BAR_WIDTH + 50) / 100;
    let mut out = String::with_capacity(BAR_WIDTH * 3);
    out.extend(std::iter::repeat('█').take(filled));
    out.extend(std::iter::repeat('░').take(BAR_WIDTH - filled));
    out
}

fn goal_line(view: &GoalView) -> String {
    let row = view
        .row_index
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    format!(
        "  {row:>4}  {bar} {progress:>3}%  {description}  {caption}",
        bar = bar(view.progress),
        progress = view.progress,
        description = view.description,
        caption = view.caption,
    )
}

/// Board as text, one block per category
#[must_use]
pub fn dashboard_text(dashboard: &Dashboard) -> String {
    if dashboard.is_empty() {
        return "No goals yet.\n".to_string();
    }

    let mut out = String::new();
    for (category, views) in &dashboard.columns {
        let _ = writeln!(out, "{category}");
        for view in views {
            let _ = writeln!(out, "{}", goal_line(view));
        }
        out.push('\n');
    }
    out
}

/// Board as pretty JSON
///
/// # Errors
/// Returns the serializer error, which only occurs for non-string map keys
pub fn dashboard_json(dashboard: &Dashboard) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dashboard)
}

/// Colors derived from one goal color
#[must_use]
pub fn palette_text(color: HexColor) -> String {
    let rows = [
        ("fill", color),
        ("track", color.lighten(TRACK_LIGHTEN)),
        ("text", color.contrast()),
        ("accent", color.darken(DEFAULT_DARKEN)),
        ("hover", color.darken(HOVER_DARKEN)),
    ];
    let mut out = String::new();
    for (name, value) in rows {
        let _ = writeln!(out, "{name:<7}{value}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalboard_model::Goal;
    use goalboard_test_utils::sample_goal;
    use pretty_assertions::assert_eq;

    #[test]
    fn bar_bounds() {
        assert_eq!(bar(0), "░".repeat(BAR_WIDTH));
        assert_eq!(bar(100), "█".repeat(BAR_WIDTH));
        assert_eq!(bar(50).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(bar(250), bar(100));
    }

    #[test]
    fn board_groups_by_category() {
        let goals = vec![
            sample_goal(2),
            Goal::new("Read 12 books", "Books", 0.0, 12.0).with_current(3.0),
            sample_goal(4),
        ];
        let text = dashboard_text(&Dashboard::new(&goals));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Fitness");
        assert!(lines[1].contains("   2  "));
        assert!(lines[1].ends_with("Run 100 miles  10/100 mi"));
        assert!(lines[2].contains("   4  "));
        assert_eq!(lines[4], "Books");
        assert!(lines[5].trim_start().starts_with("-  "));
        assert!(lines[5].contains(" 25%  "));
    }

    #[test]
    fn empty_board() {
        assert_eq!(dashboard_text(&Dashboard::default()), "No goals yet.\n");
    }

    #[test]
    fn json_board() {
        let json = dashboard_json(&Dashboard::new(&[sample_goal(2)])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["columns"]["Fitness"][0]["rowIndex"], 2);
        assert_eq!(value["columns"]["Fitness"][0]["fill"], "#3366ff");
    }

    #[test]
    fn palette_for_black() {
        let text = palette_text(HexColor::BLACK);
        assert_eq!(
            text,
            "fill   #000000\ntrack  #282828\ntext   #ffffff\naccent #000000\nhover  #000000\n"
        );
    }
}
