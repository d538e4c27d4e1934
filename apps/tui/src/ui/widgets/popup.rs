use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::Widget;

/// A box taking the given share of `area`, centred in both directions.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);

    popup
}

/// A `width` x `height` box whose bottom-left corner sits on `(column, row)`,
/// pushed back inside `bounds` when it would stick out.
pub fn anchored_rect(column: u16, row: u16, width: u16, height: u16, bounds: Rect) -> Rect {
    let width = width.min(bounds.width);
    let height = height.min(bounds.height);

    let x = column.min(bounds.right().saturating_sub(width)).max(bounds.x);
    let y = row
        .saturating_sub(height.saturating_sub(1))
        .max(bounds.y)
        .min(bounds.bottom().saturating_sub(height));

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Blanks the cells under a popup before it is drawn.
pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_the_popup() {
        let popup = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(popup, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn anchored_boxes_grow_up_and_right() {
        let bounds = Rect::new(10, 10, 40, 20);
        assert_eq!(anchored_rect(20, 20, 10, 4, bounds), Rect::new(20, 17, 10, 4));
    }

    #[test]
    fn anchored_boxes_stay_inside_bounds() {
        let bounds = Rect::new(10, 10, 40, 20);

        assert_eq!(anchored_rect(48, 11, 10, 4, bounds), Rect::new(40, 10, 10, 4));
        assert_eq!(anchored_rect(0, 0, 60, 30, bounds), bounds);
    }
}
