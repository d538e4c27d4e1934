use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use tech_radar_engine::{chart_radius_for, Point};

/// Nominal pixel size of one terminal cell; keeps circles round.
pub const CELL_WIDTH_PX: f64 = 12.0;
pub const CELL_HEIGHT_PX: f64 = 24.0;

/// Below this the radar pane counts as having no drawing surface.
pub const MIN_RADAR_WIDTH: u16 = 8;
pub const MIN_RADAR_HEIGHT: u16 = 6;

pub const DETAIL_HEIGHT: u16 = 14;

/// Screen regions, computed the same way for drawing and for mouse hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub radar: Rect,
    pub legend: Rect,
    pub detail: Rect,
    pub status: Rect,
    pub shortcuts: Rect,
}

impl ScreenLayout {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title area
                Constraint::Min(8),    // Radar and side panels
                Constraint::Length(3), // Status area
                Constraint::Length(1), // Shortcuts hint
            ])
            .split(area.inner(Margin::new(1, 0)));

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(rows[1]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(DETAIL_HEIGHT)])
            .split(columns[1]);

        Self {
            title: rows[0],
            radar: columns[0],
            legend: side[0],
            detail: side[1],
            status: rows[2],
            shortcuts: rows[3],
        }
    }

    /// The chart canvas inside the radar pane's border, if there is room.
    pub fn chart_viewport(&self) -> Option<ChartViewport> {
        ChartViewport::new(self.radar.inner(Margin::new(1, 1)))
    }

    /// Legend rows inside the legend pane's border.
    pub fn legend_body(&self) -> Rect {
        self.legend.inner(Margin::new(1, 1))
    }
}

/// Maps between terminal cells and chart-local pixels centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartViewport {
    pub area: Rect,
    pub half_width: f64,
    pub half_height: f64,
}

impl ChartViewport {
    pub fn new(area: Rect) -> Option<Self> {
        if area.width < MIN_RADAR_WIDTH || area.height < MIN_RADAR_HEIGHT {
            return None;
        }

        Some(Self {
            area,
            half_width: f64::from(area.width) * CELL_WIDTH_PX / 2.0,
            half_height: f64::from(area.height) * CELL_HEIGHT_PX / 2.0,
        })
    }

    /// Edge of the square container the chart is fitted into.
    pub fn container_size(&self) -> f64 {
        (self.half_width * 2.0).min(self.half_height * 2.0)
    }

    pub fn chart_radius(&self) -> f64 {
        chart_radius_for(self.container_size())
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    /// Centre of the cell at `(column, row)` in chart pixels, y down.
    pub fn to_chart(&self, column: u16, row: u16) -> Option<Point> {
        if !self.contains(column, row) {
            return None;
        }

        let rel_x = f64::from(column - self.area.x) + 0.5;
        let rel_y = f64::from(row - self.area.y) + 0.5;
        Some(Point {
            x: rel_x.mul_add(CELL_WIDTH_PX, -self.half_width),
            y: rel_y.mul_add(CELL_HEIGHT_PX, -self.half_height),
        })
    }

    /// The cell containing a chart point, clamped to the viewport.
    pub fn to_cell(&self, point: Point) -> (u16, u16) {
        let max_column = f64::from(self.area.width.saturating_sub(1));
        let max_row = f64::from(self.area.height.saturating_sub(1));
        let column = ((point.x + self.half_width) / CELL_WIDTH_PX).floor().clamp(0.0, max_column);
        let row = ((point.y + self.half_height) / CELL_HEIGHT_PX).floor().clamp(0.0, max_row);

        (self.area.x + column as u16, self.area.y + row as u16)
    }

    /// Canvas bounds; the canvas y axis points up, so chart y is flipped
    /// when drawing.
    pub const fn x_bounds(&self) -> [f64; 2] {
        [-self.half_width, self.half_width]
    }

    pub const fn y_bounds(&self) -> [f64; 2] {
        [-self.half_height, self.half_height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ChartViewport {
        ChartViewport::new(Rect::new(10, 5, 60, 30)).unwrap()
    }

    #[test]
    fn layout_splits_the_screen_without_overlap() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 120, 40));

        assert_eq!(layout.title.height, 3);
        assert_eq!(layout.status.height, 3);
        assert_eq!(layout.shortcuts.height, 1);
        assert_eq!(layout.detail.height, DETAIL_HEIGHT);
        assert!(layout.radar.right() <= layout.legend.x);
        assert!(layout.legend.bottom() <= layout.detail.y);
        assert!(layout.chart_viewport().is_some());
    }

    #[test]
    fn tiny_panes_have_no_surface() {
        assert!(ChartViewport::new(Rect::new(0, 0, 7, 20)).is_none());
        assert!(ChartViewport::new(Rect::new(0, 0, 20, 5)).is_none());
        assert!(ScreenLayout::compute(Rect::new(0, 0, 12, 20))
            .chart_viewport()
            .is_none());
    }

    #[test]
    fn container_is_the_shorter_side() {
        let viewport = viewport();
        assert!((viewport.container_size() - 720.0).abs() < f64::EPSILON);
        assert!((viewport.chart_radius() - 270.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cells_map_to_chart_pixels_and_back() {
        let viewport = viewport();

        let centre = viewport.to_chart(40, 20).unwrap();
        assert!((centre.x - 6.0).abs() < 1e-9);
        assert!((centre.y - 12.0).abs() < 1e-9);
        assert_eq!(viewport.to_cell(centre), (40, 20));

        assert_eq!(viewport.to_chart(9, 20), None);
        assert_eq!(viewport.to_cell(Point { x: 1e6, y: -1e6 }), (69, 5));
    }
}
