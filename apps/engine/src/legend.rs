//! Numbered legend and single-item detail view.
//!
//! Both read the scene, so legend row `N` and the marker labelled `N` are
//! always the same item.

use serde::Serialize;

use crate::interaction::SelectionState;
use crate::model::{ItemIndex, Rgb};
use crate::scene::Scene;

pub const DETAIL_LINK_TEXT: &str = "View full details →";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendRow {
    pub index: ItemIndex,
    pub display_number: usize,
    pub name: String,
    pub ring_name: String,
    pub ring_color: Rgb,
    /// Badge colour for the number.
    pub quadrant_color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendGroup {
    pub quadrant_id: usize,
    pub name: String,
    pub color: Rgb,
    pub rows: Vec<LegendRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub groups: Vec<LegendGroup>,
}

impl Legend {
    /// Groups by quadrant id, keeping input order inside each group.
    pub fn build(scene: &Scene) -> Self {
        let groups = scene
            .quadrants
            .iter()
            .map(|quadrant| LegendGroup {
                quadrant_id: quadrant.id,
                name: quadrant.name.clone(),
                color: quadrant.color,
                rows: scene
                    .markers
                    .iter()
                    .filter(|marker| marker.item.quadrant_id == quadrant.id)
                    .map(|marker| LegendRow {
                        index: marker.index,
                        display_number: marker.display_number,
                        name: marker.item.name.clone(),
                        ring_name: scene
                            .ring(marker.item.ring_id)
                            .map(|ring| ring.name.clone())
                            .unwrap_or_default(),
                        ring_color: marker.ring_color,
                        quadrant_color: marker.color,
                    })
                    .collect(),
            })
            .collect();

        Self { groups }
    }

    /// Rows in display order: group by group, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &LegendRow> {
        self.groups.iter().flat_map(|group| group.rows.iter())
    }

    pub fn row_by_number(&self, display_number: usize) -> Option<&LegendRow> {
        self.rows().find(|row| row.display_number == display_number)
    }

    /// Position of a row in [`Legend::rows`] order.
    pub fn position_of(&self, index: ItemIndex) -> Option<usize> {
        self.rows().position(|row| row.index == index)
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub text: String,
    pub color: Rgb,
}

/// Everything shown for the selected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub index: ItemIndex,
    pub display_number: usize,
    pub name: String,
    pub quadrant: Badge,
    pub ring: Badge,
    pub tags: Vec<String>,
    /// `None` when the item has no description.
    pub description: Option<String>,
    pub link_text: &'static str,
    pub detail_url: String,
}

impl DetailView {
    pub fn for_item(scene: &Scene, index: ItemIndex) -> Option<Self> {
        let marker = scene.marker(index)?;
        let quadrant = scene.quadrant(marker.item.quadrant_id)?;
        let ring = scene.ring(marker.item.ring_id)?;

        Some(Self {
            index,
            display_number: marker.display_number,
            name: marker.item.name.clone(),
            quadrant: Badge {
                text: quadrant.name.clone(),
                color: quadrant.color,
            },
            ring: Badge {
                text: ring.name.clone(),
                color: ring.color,
            },
            tags: marker.item.tags.clone(),
            description: Some(marker.item.description.trim())
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            link_text: DETAIL_LINK_TEXT,
            detail_url: marker.item.detail_url.clone(),
        })
    }
}

/// The panel's content is replaced wholesale on every selection change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPanel {
    view: Option<DetailView>,
    scroll_requested: bool,
}

impl DetailPanel {
    pub const fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }

    /// Rebuilds from the current selection; empty when nothing is selected.
    pub fn update(&mut self, scene: &Scene, state: &SelectionState) {
        let view = state
            .selected
            .and_then(|index| DetailView::for_item(scene, index));

        self.scroll_requested = view.is_some();
        self.view = view;
    }

    /// Returns and clears the pending scroll-into-view request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{ClickTarget, Effect, InteractionController, InteractionEvent};
    use crate::model::tests::{item, radar};
    use crate::model::Item;
    use crate::scene::SceneBuilder;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn docker() -> Item {
        Item {
            tags: vec!["containers".to_string(), "runtime".to_string()],
            description: "Container runtime.".to_string(),
            detail_url: "platforms/adopt/docker.html".to_string(),
            ..item("Docker", 2, 0)
        }
    }

    fn scene(items: Vec<Item>) -> Scene {
        SceneBuilder::default()
            .build_radar(&radar(items), 350.0, &mut StdRng::seed_from_u64(10))
            .unwrap()
    }

    #[test]
    fn groups_follow_quadrant_order_and_keep_item_order() {
        let scene = scene(vec![
            item("Kubernetes", 2, 2),
            item("Git", 1, 0),
            item("TDD", 0, 0),
            item("Docker", 2, 0),
        ]);
        let legend = Legend::build(&scene);

        let names: Vec<Vec<&str>> = legend
            .groups
            .iter()
            .map(|group| group.rows.iter().map(|row| row.name.as_str()).collect())
            .collect();
        assert_eq!(
            names,
            vec![vec!["TDD"], vec!["Git"], vec!["Kubernetes", "Docker"], vec![]]
        );

        let numbers: Vec<usize> = legend.rows().map(|row| row.display_number).collect();
        assert_eq!(numbers, vec![3, 2, 1, 4]);
        assert_eq!(legend.len(), 4);
        assert_eq!(legend.groups[2].rows[0].ring_name, "Assess");
    }

    #[test]
    fn legend_and_marker_numbers_denote_the_same_item() {
        let items = (0..20)
            .map(|n| item(&format!("item-{n}"), (n * 7) % 4, n % 4))
            .collect();
        let scene = scene(items);
        let legend = Legend::build(&scene);

        for marker in &scene.markers {
            let row = legend.row_by_number(marker.display_number).unwrap();
            assert_eq!(row.index, marker.index);
            assert_eq!(row.name, marker.item.name);
        }
        assert_eq!(legend.len(), scene.markers.len());
    }

    #[test]
    fn clicking_legend_row_two_shows_docker() {
        let scene = scene(vec![item("Git", 1, 0), docker()]);
        let mut controller = InteractionController::new((12.0, 12.0));
        let mut panel = DetailPanel::default();

        let effects = controller.handle(&scene, InteractionEvent::Click(ClickTarget::LegendRow(2)));
        assert!(effects.contains(&Effect::ScrollDetailIntoView));
        panel.update(&scene, controller.state());

        let view = panel.view().unwrap();
        assert_eq!(view.name, "Docker");
        assert_eq!(view.tags, vec!["containers", "runtime"]);
        assert_eq!(view.quadrant.text, "Platforms");
        assert_eq!(view.ring.text, "Adopt");
        assert_eq!(view.description.as_deref(), Some("Container runtime."));
        assert_eq!(view.detail_url, "platforms/adopt/docker.html");
        assert_eq!(view.link_text, "View full details →");
        assert!(panel.take_scroll_request());
        assert!(!panel.take_scroll_request());
    }

    #[test]
    fn empty_description_is_omitted() {
        let scene = scene(vec![item("Git", 1, 0)]);
        let view = DetailView::for_item(&scene, 0).unwrap();
        assert_eq!(view.description, None);
    }

    #[test]
    fn panel_is_empty_without_a_selection() {
        let scene = scene(vec![docker()]);
        let mut panel = DetailPanel::default();

        panel.update(
            &scene,
            &SelectionState {
                hovered: Some(0),
                selected: None,
            },
        );
        assert!(panel.view().is_none());
        assert!(!panel.take_scroll_request());

        panel.update(
            &scene,
            &SelectionState {
                hovered: None,
                selected: Some(0),
            },
        );
        assert_eq!(panel.view().map(|view| view.index), Some(0));
    }
}
