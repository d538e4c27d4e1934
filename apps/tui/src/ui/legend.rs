use ratatui::layout::Rect;
use tech_radar_engine::{Legend, LegendGroup, LegendRow};

/// One printed line of the legend pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLine<'a> {
    Header(&'a LegendGroup),
    Row(&'a LegendRow),
}

/// Quadrant headings followed by their rows, in display order.
pub fn legend_lines(legend: &Legend) -> Vec<LegendLine<'_>> {
    legend
        .groups
        .iter()
        .flat_map(|group| {
            std::iter::once(LegendLine::Header(group)).chain(group.rows.iter().map(LegendLine::Row))
        })
        .collect()
}

/// First line shown so the cursor row stays inside a pane `height` lines tall.
pub fn scroll_offset(lines: &[LegendLine<'_>], cursor: usize, height: u16) -> usize {
    let height = usize::from(height);
    if height == 0 {
        return 0;
    }

    let cursor_line = lines
        .iter()
        .filter(|line| matches!(line, LegendLine::Row(_)))
        .nth(cursor)
        .and_then(|target| lines.iter().position(|line| line == target))
        .unwrap_or(0);

    (cursor_line + 1).saturating_sub(height)
}

/// The legend row printed at terminal `row`, if any.
pub fn row_at<'a>(legend: &'a Legend, cursor: usize, body: Rect, column: u16, row: u16) -> Option<&'a LegendRow> {
    if column < body.x || column >= body.right() || row < body.y || row >= body.bottom() {
        return None;
    }

    let lines = legend_lines(legend);
    let offset = scroll_offset(&lines, cursor, body.height);
    match lines.get(offset + usize::from(row - body.y)) {
        Some(LegendLine::Row(legend_row)) => Some(legend_row),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tech_radar_engine::Rgb;

    fn row(index: usize, number: usize, name: &str) -> LegendRow {
        LegendRow {
            index,
            display_number: number,
            name: name.to_string(),
            ring_name: "Adopt".to_string(),
            ring_color: Rgb(0x5b, 0xa3, 0x00),
            quadrant_color: Rgb(0x8f, 0xa2, 0x27),
        }
    }

    fn legend() -> Legend {
        Legend {
            groups: vec![
                LegendGroup {
                    quadrant_id: 0,
                    name: "Techniques".to_string(),
                    color: Rgb(0x8f, 0xa2, 0x27),
                    rows: vec![row(2, 3, "TDD")],
                },
                LegendGroup {
                    quadrant_id: 1,
                    name: "Tools".to_string(),
                    color: Rgb(0x58, 0x7b, 0xa2),
                    rows: vec![row(0, 1, "Git"), row(1, 2, "Docker")],
                },
            ],
        }
    }

    #[test]
    fn headers_precede_their_rows() {
        let legend = legend();
        let lines = legend_lines(&legend);

        assert_eq!(lines.len(), 5);
        assert!(matches!(lines[0], LegendLine::Header(group) if group.name == "Techniques"));
        assert!(matches!(lines[4], LegendLine::Row(row) if row.name == "Docker"));
    }

    #[test]
    fn scrolls_only_once_the_cursor_leaves_the_pane() {
        let legend = legend();
        let lines = legend_lines(&legend);

        assert_eq!(scroll_offset(&lines, 0, 3), 0);
        assert_eq!(scroll_offset(&lines, 2, 3), 2);
        assert_eq!(scroll_offset(&lines, 2, 0), 0);
    }

    #[test]
    fn clicks_resolve_to_rows_not_headers() {
        let legend = legend();
        let body = Rect::new(50, 4, 20, 10);

        assert_eq!(row_at(&legend, 0, body, 52, 5).map(|r| r.display_number), Some(3));
        assert_eq!(row_at(&legend, 0, body, 52, 8).map(|r| r.name.as_str()), Some("Docker"));
        assert!(row_at(&legend, 0, body, 52, 6).is_none());
        assert!(row_at(&legend, 0, body, 10, 5).is_none());
    }
}
